use std::sync::Once;

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        if let Err(e) = prioq::logging::init_logging() {
            eprintln!("test logging not installed: {e}");
        }
    });
}
