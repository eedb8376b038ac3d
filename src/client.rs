//! Browser-side rules of the game page, kept free of any DOM types so they
//! run natively under test. `ahorcado_wasm` binds them to the page.

use regex::Regex;

/// Class of keys that can still be guessed.
pub const KEY_CLASS: &str = "tecla";
/// Class a key takes once its guess went through.
pub const USED_KEY_CLASS: &str = "letra-oculta";
pub const WORD_ID: &str = "palabra";
pub const IMAGE_ID: &str = "imagen";
pub const TIMER_ID: &str = "tiempo-restante";
/// Cookie the server keeps the failure count in.
pub const FAILURES_COOKIE: &str = "fallos";
pub const GUESS_ENDPOINT: &str = "/adivinar";
pub const IMAGE_DIR: &str = "/img";
pub const IMAGE_EXT: &str = "jpg";
pub const COUNTDOWN_SECS: i32 = 10;
pub const TICK_MILLIS: u32 = 1000;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Tick {
    /// Still counting, showing this many seconds.
    Running(i32),
    /// Reached zero on this tick. Cancel the timer and reload.
    Expired,
    /// Already expired earlier; nothing changes.
    Stopped,
}

/// Seconds left before the page forces a reload.
#[derive(Debug, Clone)]
pub struct Countdown {
    remaining: i32,
    expired: bool,
}

impl Default for Countdown {
    fn default() -> Self {
        Countdown::new(COUNTDOWN_SECS)
    }
}

impl Countdown {
    pub fn new(seconds: i32) -> Countdown {
        Countdown {
            remaining: seconds,
            expired: false,
        }
    }

    pub fn remaining(&self) -> i32 {
        self.remaining
    }

    pub fn tick(&mut self) -> Tick {
        if self.expired {
            return Tick::Stopped;
        }
        self.remaining -= 1;
        if self.remaining <= 0 {
            self.expired = true;
            Tick::Expired
        } else {
            Tick::Running(self.remaining)
        }
    }
}

/// Value of cookie `name` in a `document.cookie` string, or `""`.
///
/// An entry counts at the very start of the string or after `;` and optional
/// whitespace. A leading entry wins, otherwise the last one does. Whitespace
/// around `=` is skipped and the value runs to the next `;` untrimmed.
pub fn read_cookie(cookies: &str, name: &str) -> String {
    let pattern = format!(
        r"(?:^|.*;\s*){}\s*=\s*([^;]*).*$|^.*$",
        regex::escape(name)
    );
    let Ok(re) = Regex::new(&pattern) else {
        return String::new();
    };
    re.captures(cookies)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

/// Gallows image for a failure count, or `None` to keep the current one.
pub fn failure_image(failures: &str) -> Option<String> {
    if failures.is_empty() {
        None
    } else {
        Some(format!("{IMAGE_DIR}/{failures}.{IMAGE_EXT}"))
    }
}

pub fn guess_url(letter: char) -> String {
    format!("{GUESS_ENDPOINT}/{letter}")
}

/// The letter a key stands for: its first displayed character.
pub fn guess_letter(label: &str) -> Option<char> {
    label.chars().find(|c| !c.is_whitespace())
}

/// Lets one guess be in flight at a time.
///
/// A successful guess reloads the page, so clicks made while a request is
/// pending would only race it.
#[derive(Debug, Default, Clone)]
pub struct GuessGate {
    pending: Option<char>,
}

impl GuessGate {
    pub fn new() -> GuessGate {
        GuessGate::default()
    }

    /// Claim the gate for `letter`. False if another guess is pending.
    pub fn try_begin(&mut self, letter: char) -> bool {
        if self.pending.is_some() {
            return false;
        }
        self.pending = Some(letter);
        true
    }

    pub fn pending(&self) -> Option<char> {
        self.pending
    }

    /// Decide what a finished guess request does to the page.
    ///
    /// Closes the gate either way. Only the first answer for a pending guess
    /// can render, and nothing renders once the page is torn down.
    pub fn finish(&mut self, response: Result<String, String>, torn_down: bool) -> GuessOutcome {
        let Some(letter) = self.pending.take() else {
            return GuessOutcome::Ignore;
        };
        if torn_down {
            return GuessOutcome::Ignore;
        }
        match response {
            Ok(body) => GuessOutcome::Render { letter, body },
            Err(_) => GuessOutcome::Retry,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuessOutcome {
    /// Put `body` into the word region, mark the key used, then reload.
    Render { letter: char, body: String },
    /// The request failed; leave the page alone so the key can be clicked again.
    Retry,
    /// Nobody is waiting for this answer.
    Ignore,
}
