//! Best-effort detection of the desktop's light/dark preference, used to seed
//! the `dark_mode` setting on first launch.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Appearance {
    Light,
    Dark,
}

/// Dark unless the OS clearly says otherwise.
pub fn system_prefers_dark() -> bool {
    detect_preferred_appearance() != Some(Appearance::Light)
}

pub fn detect_preferred_appearance() -> Option<Appearance> {
    #[cfg(target_os = "macos")]
    {
        use std::process::Command;
        // The key is absent entirely in light mode, so any failure means Light.
        let output = Command::new("/usr/bin/defaults")
            .args(["read", "-g", "AppleInterfaceStyle"])
            .output()
            .ok()?;
        let stdout = String::from_utf8_lossy(&output.stdout).to_ascii_lowercase();
        return Some(if output.status.success() && stdout.contains("dark") {
            Appearance::Dark
        } else {
            Appearance::Light
        });
    }

    #[cfg(target_os = "windows")]
    {
        use winreg::enums::HKEY_CURRENT_USER;
        use winreg::RegKey;
        let personalize = RegKey::predef(HKEY_CURRENT_USER)
            .open_subkey("Software\\Microsoft\\Windows\\CurrentVersion\\Themes\\Personalize")
            .ok()?;
        let light: u32 = personalize.get_value("AppsUseLightTheme").ok()?;
        return Some(if light == 0 {
            Appearance::Dark
        } else {
            Appearance::Light
        });
    }

    #[cfg(target_os = "linux")]
    {
        use std::process::Command;
        let output = Command::new("gsettings")
            .args(["get", "org.gnome.desktop.interface", "color-scheme"])
            .output()
            .ok()?;
        if !output.status.success() {
            return None;
        }
        let scheme = String::from_utf8_lossy(&output.stdout).to_ascii_lowercase();
        if scheme.contains("prefer-dark") {
            Some(Appearance::Dark)
        } else if scheme.contains("prefer-light") || scheme.contains("default") {
            Some(Appearance::Light)
        } else {
            None
        }
    }

    #[cfg(not(any(target_os = "macos", target_os = "windows", target_os = "linux")))]
    {
        None
    }
}
