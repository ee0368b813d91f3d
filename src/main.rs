fn main() {
    // Initialize panic hook for better error messages in browser console
    #[cfg(target_arch = "wasm32")]
    {
        console_error_panic_hook::set_once();
        wasm_logger::init(wasm_logger::Config::new(log::Level::Info));
    }

    log::info!("Starting ui-actions");

    if let Err(e) = ui_actions::web::bind_when_ready() {
        log::error!("Failed to schedule UI action binding: {}", e);
    }
}
