use wasm_bindgen::prelude::*;

mod api;
mod chat_ui;
mod dom;
mod markdown;
mod utils;

/// Initialize the WASM application
/// This sets up panic hooks and logging
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());

    log::info!("Ninni WASM initialized");
}

/// Mount the chat UI on the current page
///
/// `api_base` is the server origin; requests go to the page's own origin when
/// it is omitted.
#[wasm_bindgen]
pub fn init_chat(api_base: Option<String>) -> Result<(), JsValue> {
    let api_base = api_base.unwrap_or_default();
    log::info!("Initializing chat (api base: {:?})", api_base);
    chat_ui::ChatApp::new(api_base)?.start()
}
