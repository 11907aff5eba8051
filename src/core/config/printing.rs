use crate::core::config::data::{path_display, Config};

impl Config {
    pub fn print_all(&self) {
        println!("Current configuration:");
        print_entry("model", self.model.as_deref(), self.model());
        print_entry(
            "api-base-url",
            self.api_base_url.as_deref(),
            self.api_base_url(),
        );
        print_entry(
            "temperature",
            self.temperature.map(|t| t.to_string()).as_deref(),
            &self.temperature().to_string(),
        );
        print_entry(
            "request-timeout",
            self.request_timeout_secs.map(|t| t.to_string()).as_deref(),
            &format!("{}", self.request_timeout().as_secs()),
        );
        print_entry(
            "history-window",
            self.history_window.map(|w| w.to_string()).as_deref(),
            &self.history_window().to_string(),
        );
        match self.data_dir() {
            Ok(dir) if self.data_dir.is_some() => println!("  data-dir: {}", path_display(dir)),
            Ok(dir) => println!("  data-dir: (default: {})", path_display(dir)),
            Err(err) => println!("  data-dir: (unavailable: {err})"),
        }
    }
}

fn print_entry(name: &str, configured: Option<&str>, effective: &str) {
    match configured {
        Some(value) => println!("  {name}: {value}"),
        None => println!("  {name}: (default: {effective})"),
    }
}
