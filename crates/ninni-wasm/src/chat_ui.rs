use chrono::Utc;
use ninni_chat::{new_session_id, ChatState, Message, ReplyOutcome, Sender, UiEffect, DEFAULT_GREETING};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Element, Event};

use crate::api;
use crate::dom;
use crate::markdown;
use crate::utils;

const MESSAGES_ID: &str = "messages";
const MESSAGES_CONTAINER_ID: &str = "messages-container";
const TYPING_ID: &str = "typing-indicator";
const FORM_ID: &str = "chat-form";
const INPUT_ID: &str = "message-input";
const SEND_ID: &str = "send-button";

/// Browser front end over the shared chat state machine
#[derive(Clone)]
pub struct ChatApp {
    document: Document,
    api_base: String,
    state: Rc<RefCell<ChatState>>,
}

impl ChatApp {
    pub fn new(api_base: String) -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("No window"))?;
        let document = window.document().ok_or_else(|| JsValue::from_str("No document"))?;

        let now = Utc::now();
        let state = ChatState::with_greeting(new_session_id(now), DEFAULT_GREETING, now);
        log::info!("Chat session: {}", state.session_id());

        Ok(Self {
            document,
            api_base,
            state: Rc::new(RefCell::new(state)),
        })
    }

    pub fn start(self) -> Result<(), JsValue> {
        self.render_history()?;
        self.setup_message_input()?;
        self.setup_form()?;
        self.update_controls()?;
        dom::get_input_by_id(&self.document, INPUT_ID)?.focus()?;
        Ok(())
    }

    fn setup_message_input(&self) -> Result<(), JsValue> {
        let input = dom::get_input_by_id(&self.document, INPUT_ID)?;
        let app = self.clone();

        let closure = Closure::wrap(Box::new(move |_event: Event| {
            if let Err(e) = app.update_controls() {
                log::error!("Failed to update controls: {:?}", e);
            }
        }) as Box<dyn FnMut(_)>);

        input.add_event_listener_with_callback("input", closure.as_ref().unchecked_ref())?;
        closure.forget();

        Ok(())
    }

    fn setup_form(&self) -> Result<(), JsValue> {
        let form = dom::get_element_by_id(&self.document, FORM_ID)?;
        let app = self.clone();

        let closure = Closure::wrap(Box::new(move |event: Event| {
            event.prevent_default();
            if let Err(e) = app.submit() {
                log::error!("Failed to send message: {:?}", e);
            }
        }) as Box<dyn FnMut(_)>);

        form.add_event_listener_with_callback("submit", closure.as_ref().unchecked_ref())?;
        closure.forget();

        Ok(())
    }

    fn submit(&self) -> Result<(), JsValue> {
        let input = dom::get_input_by_id(&self.document, INPUT_ID)?;
        let text = input.value();

        let request = match self.state.borrow_mut().submit(&text, Utc::now()) {
            Some(request) => request,
            None => return Ok(()),
        };

        input.set_value("");
        self.append_latest()?;
        self.set_typing(true)?;
        self.update_controls()?;
        self.scroll_to_latest()?;

        let app = self.clone();
        spawn_local(async move {
            let outcome = api::send_chat(&app.api_base, &request).await;
            if let ReplyOutcome::TransportFailed(reason) = &outcome {
                log::error!("Chat request failed: {}", reason);
            }

            let effects = app.state.borrow_mut().receive(outcome, Utc::now());
            if let Err(e) = app.settle(&effects) {
                log::error!("Failed to render reply: {:?}", e);
            }
        });

        Ok(())
    }

    /// Render the reply and apply the effects the state machine asked for
    fn settle(&self, effects: &[UiEffect]) -> Result<(), JsValue> {
        self.set_typing(false)?;
        self.append_latest()?;
        self.update_controls()?;

        for effect in effects {
            match effect {
                UiEffect::ScrollToLatest => self.scroll_to_latest()?,
                UiEffect::FocusInput => dom::get_input_by_id(&self.document, INPUT_ID)?.focus()?,
            }
        }

        Ok(())
    }

    fn render_history(&self) -> Result<(), JsValue> {
        let container = dom::get_element_by_id(&self.document, MESSAGES_ID)?;
        container.set_inner_html("");

        let state = self.state.borrow();
        for message in state.messages() {
            container.append_child(&self.render_message(message)?)?;
        }

        self.scroll_to_latest()
    }

    fn append_latest(&self) -> Result<(), JsValue> {
        let container = dom::get_element_by_id(&self.document, MESSAGES_ID)?;
        let state = self.state.borrow();
        if let Some(message) = state.latest() {
            container.append_child(&self.render_message(message)?)?;
        }
        Ok(())
    }

    fn render_message(&self, message: &Message) -> Result<Element, JsValue> {
        let class = match message.sender {
            Sender::User => "message user-message",
            Sender::Assistant => "message assistant-message",
        };
        let row = dom::create_element_with_class(&self.document, "div", class)?;
        row.set_attribute("data-id", &message.id.to_string())?;

        if message.sender == Sender::Assistant {
            let avatar = dom::create_element_with_class(&self.document, "div", "message-avatar")?;
            avatar.set_text_content(Some("🌙"));
            row.append_child(&avatar)?;
        }

        let content = dom::create_element_with_class(&self.document, "div", "message-content")?;
        let body = dom::create_element_with_class(&self.document, "div", "message-text")?;
        body.set_inner_html(&markdown::render_message_content(&message.text, message.sender));
        content.append_child(&body)?;

        let time = dom::create_element_with_class(&self.document, "span", "message-time")?;
        time.set_text_content(Some(&utils::format_time(message.timestamp)));
        content.append_child(&time)?;

        row.append_child(&content)?;
        Ok(row)
    }

    fn set_typing(&self, visible: bool) -> Result<(), JsValue> {
        let indicator = dom::get_html_element_by_id(&self.document, TYPING_ID)?;
        if visible {
            dom::show_element(&indicator);
        } else {
            dom::hide_element(&indicator);
        }
        Ok(())
    }

    /// Input is locked while a reply is pending; send also needs non-blank text
    fn update_controls(&self) -> Result<(), JsValue> {
        let input = dom::get_input_by_id(&self.document, INPUT_ID)?;
        let button = dom::get_button_by_id(&self.document, SEND_ID)?;
        let state = self.state.borrow();

        input.set_disabled(state.is_awaiting_reply());
        button.set_disabled(!state.can_submit(&input.value()));
        Ok(())
    }

    fn scroll_to_latest(&self) -> Result<(), JsValue> {
        let container = dom::get_element_by_id(&self.document, MESSAGES_CONTAINER_ID)?;
        dom::scroll_to_bottom(&container);
        Ok(())
    }
}
