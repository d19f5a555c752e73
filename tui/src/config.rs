use anyhow::{anyhow, Context, Result};
use calnotes_core::models::WeekStart;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default number of graphemes shown for a collapsed note
pub const DEFAULT_PREVIEW_CHARS: usize = 50;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Keymap {
    pub quit: String,
    pub help: String,
    pub prev_month: String,
    pub next_month: String,
    pub month_selector: String,
    pub today: String,
}

impl Default for Keymap {
    fn default() -> Self {
        Self {
            quit: "q".to_string(),
            help: "h".to_string(),
            prev_month: "pageup".to_string(),
            next_month: "pagedown".to_string(),
            month_selector: "m".to_string(),
            today: "t".to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct CalendarConfig {
    pub week_start: WeekStart,
    pub preview_chars: usize,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            week_start: WeekStart::Sunday,
            preview_chars: DEFAULT_PREVIEW_CHARS,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub calendar: CalendarConfig,
    pub keymap: Keymap,
}

/// Key bindings resolved from the keymap strings
#[derive(Debug, Clone, PartialEq)]
pub struct Bindings {
    pub quit: KeyBinding,
    pub help: KeyBinding,
    pub prev_month: KeyBinding,
    pub next_month: KeyBinding,
    pub month_selector: KeyBinding,
    pub today: KeyBinding,
}

impl Bindings {
    pub fn from_keymap(keymap: &Keymap) -> Result<Self> {
        Ok(Self {
            quit: parse_binding("quit", &keymap.quit)?,
            help: parse_binding("help", &keymap.help)?,
            prev_month: parse_binding("prev_month", &keymap.prev_month)?,
            next_month: parse_binding("next_month", &keymap.next_month)?,
            month_selector: parse_binding("month_selector", &keymap.month_selector)?,
            today: parse_binding("today", &keymap.today)?,
        })
    }
}

impl Default for Bindings {
    fn default() -> Self {
        Self {
            quit: KeyBinding::plain(KeyCode::Char('q')),
            help: KeyBinding::plain(KeyCode::Char('h')),
            prev_month: KeyBinding::plain(KeyCode::PageUp),
            next_month: KeyBinding::plain(KeyCode::PageDown),
            month_selector: KeyBinding::plain(KeyCode::Char('m')),
            today: KeyBinding::plain(KeyCode::Char('t')),
        }
    }
}

fn parse_binding(action: &str, spec: &str) -> Result<KeyBinding> {
    KeyBinding::parse(spec).with_context(|| format!("invalid key for `{action}`"))
}

/// A single key with modifiers, written as e.g. `ctrl-b`, `alt-enter`, `pageup`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    pub fn plain(code: KeyCode) -> Self {
        Self { code, modifiers: KeyModifiers::NONE }
    }

    pub fn parse(spec: &str) -> Result<Self> {
        let spec = spec.trim();
        if spec.is_empty() {
            return Err(anyhow!("empty key binding"));
        }
        // `-` on its own (or as the final key, e.g. `ctrl--`) names the minus key
        let (mods_part, key_part) = match spec.strip_suffix("--") {
            Some(rest) => (rest, "-"),
            None if spec == "-" => ("", "-"),
            None => match spec.rsplit_once('-') {
                Some((mods, key)) => (mods, key),
                None => ("", spec),
            },
        };

        let mut modifiers = KeyModifiers::NONE;
        for m in mods_part.split('-').filter(|m| !m.is_empty()) {
            modifiers |= match m.to_ascii_lowercase().as_str() {
                "ctrl" | "control" => KeyModifiers::CONTROL,
                "alt" => KeyModifiers::ALT,
                "shift" => KeyModifiers::SHIFT,
                other => return Err(anyhow!("unknown modifier `{other}` in `{spec}`")),
            };
        }

        let code = match key_part.to_ascii_lowercase().as_str() {
            "enter" => KeyCode::Enter,
            "esc" | "escape" => KeyCode::Esc,
            "tab" => KeyCode::Tab,
            "space" => KeyCode::Char(' '),
            "backspace" => KeyCode::Backspace,
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "pageup" => KeyCode::PageUp,
            "pagedown" => KeyCode::PageDown,
            "insert" => KeyCode::Insert,
            "delete" => KeyCode::Delete,
            f if f.len() > 1 && f.starts_with('f') => {
                let n: u8 = f[1..].parse().map_err(|_| anyhow!("unknown key `{key_part}`"))?;
                KeyCode::F(n)
            }
            _ => {
                let mut chars = key_part.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => KeyCode::Char(c.to_ascii_lowercase()),
                    _ => return Err(anyhow!("unknown key `{key_part}`")),
                }
            }
        };

        Ok(Self { code, modifiers })
    }

    /// Whether a key event triggers this binding. Letter case and SHIFT are
    /// ignored for character keys unless the binding asks for SHIFT.
    pub fn matches(&self, key: &KeyEvent) -> bool {
        let (code, mut mods) = match key.code {
            KeyCode::Char(c) => (KeyCode::Char(c.to_ascii_lowercase()), key.modifiers),
            other => (other, key.modifiers),
        };
        if matches!(code, KeyCode::Char(_)) && !self.modifiers.contains(KeyModifiers::SHIFT) {
            mods.remove(KeyModifiers::SHIFT);
        }
        code == self.code && mods == self.modifiers
    }
}

/// Short label for a keymap entry, as shown in the header and help screen
pub fn key_label(spec: &str) -> String {
    match spec.trim().to_ascii_lowercase().as_str() {
        "pageup" => "PgUp".to_string(),
        "pagedown" => "PgDn".to_string(),
        _ => spec.trim().to_string(),
    }
}

/// Load the config at `path`, writing the defaults there first if the file does not exist
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        let config = Config::default();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let toml = toml::to_string(&config)?;
        fs::write(path, toml)
            .with_context(|| format!("failed to write default config to {}", path.display()))?;
        return Ok(config);
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let config: Config = toml::from_str(&content)
        .with_context(|| format!("failed to parse config file {}", path.display()))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config_written_and_reloaded() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = load_config(&path).unwrap();
        assert_eq!(config, Config::default());
        assert!(path.exists());

        let reloaded = load_config(&path).unwrap();
        assert_eq!(reloaded, config);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[calendar]\nweek_start = \"monday\"\n").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.calendar.week_start, WeekStart::Monday);
        assert_eq!(config.calendar.preview_chars, DEFAULT_PREVIEW_CHARS);
        assert_eq!(config.keymap, Keymap::default());
    }

    #[test]
    fn test_malformed_config_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[calendar\nweek_start = 3").unwrap();
        assert!(load_config(&path).is_err());
    }

    #[test]
    fn test_parse_bindings() {
        let b = KeyBinding::parse("ctrl-b").unwrap();
        assert_eq!(b.code, KeyCode::Char('b'));
        assert_eq!(b.modifiers, KeyModifiers::CONTROL);

        let b = KeyBinding::parse("alt-enter").unwrap();
        assert_eq!(b.code, KeyCode::Enter);
        assert_eq!(b.modifiers, KeyModifiers::ALT);

        let b = KeyBinding::parse("ctrl-shift-t").unwrap();
        assert_eq!(b.modifiers, KeyModifiers::CONTROL | KeyModifiers::SHIFT);

        assert_eq!(KeyBinding::parse("pageup").unwrap(), KeyBinding::plain(KeyCode::PageUp));
        assert_eq!(KeyBinding::parse("f5").unwrap(), KeyBinding::plain(KeyCode::F(5)));
        assert_eq!(KeyBinding::parse("-").unwrap(), KeyBinding::plain(KeyCode::Char('-')));
        assert_eq!(KeyBinding::parse("ctrl--").unwrap().code, KeyCode::Char('-'));

        assert!(KeyBinding::parse("").is_err());
        assert!(KeyBinding::parse("hyper-x").is_err());
        assert!(KeyBinding::parse("banana").is_err());
    }

    #[test]
    fn test_binding_matches_ignores_case() {
        let q = KeyBinding::parse("q").unwrap();
        assert!(q.matches(&KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE)));
        assert!(q.matches(&KeyEvent::new(KeyCode::Char('Q'), KeyModifiers::SHIFT)));
        assert!(!q.matches(&KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL)));
    }

    #[test]
    fn test_default_keymap_resolves_to_default_bindings() {
        let bindings = Bindings::from_keymap(&Keymap::default()).unwrap();
        assert_eq!(bindings, Bindings::default());
    }

    #[test]
    fn test_key_label() {
        assert_eq!(key_label("pageup"), "PgUp");
        assert_eq!(key_label("PageDown"), "PgDn");
        assert_eq!(key_label(" ctrl-x "), "ctrl-x");
        assert_eq!(key_label("q"), "q");
    }

    #[test]
    fn test_bad_keymap_names_the_action() {
        let keymap = Keymap { today: "nope-t".to_string(), ..Keymap::default() };
        let err = Bindings::from_keymap(&keymap).unwrap_err();
        assert!(format!("{err:#}").contains("today"));
    }
}
