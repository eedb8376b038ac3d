use std::cell::RefCell;
use std::rc::Rc;

use ahorcado::client::{
    self, Countdown, GuessGate, GuessOutcome, Tick, FAILURES_COOKIE, IMAGE_ID, KEY_CLASS,
    TICK_MILLIS, TIMER_ID, USED_KEY_CLASS, WORD_ID,
};
use gloo_net::http::Request;
use gloo_timers::callback::Interval;
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{console, window, Element, Event, HtmlDocument, HtmlImageElement};

/// Page state. A reload throws all of it away and `start` builds it again.
struct GameUi {
    countdown: Countdown,
    gate: GuessGate,
    /// Raw `fallos` cookie as read at load.
    failures: String,
    timer: Option<Interval>,
    torn_down: bool,
}

#[derive(Serialize)]
struct Snapshot {
    remaining: i32,
    failures: String,
    pending_guess: Option<char>,
    torn_down: bool,
}

thread_local! {
    static APP: RefCell<Option<Rc<RefCell<GameUi>>>> = RefCell::new(None);
}

impl GameUi {
    fn new(failures: String) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(GameUi {
            countdown: Countdown::default(),
            gate: GuessGate::new(),
            failures,
            timer: None,
            torn_down: false,
        }))
    }

    /// Stop the timer and disown pending guesses. Safe to call repeatedly.
    fn teardown(&mut self) {
        self.torn_down = true;
        if let Some(timer) = self.timer.take() {
            // This may run inside the timer's own callback, which must outlive the call.
            timer.cancel().forget();
        }
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            remaining: self.countdown.remaining(),
            failures: self.failures.clone(),
            pending_guess: self.gate.pending(),
            torn_down: self.torn_down,
        }
    }
}

fn with_app<T, F>(f: F) -> Result<T, JsValue>
where
    F: FnOnce(&mut GameUi) -> Result<T, JsValue>,
{
    APP.with(|app| {
        if let Some(app) = &*app.borrow() {
            let mut app = app.borrow_mut();
            f(&mut app)
        } else {
            Err(JsValue::from_str("Application not initialised"))
        }
    })
}

fn document() -> Result<web_sys::Document, JsValue> {
    window()
        .ok_or_else(|| JsValue::from_str("missing window"))?
        .document()
        .ok_or_else(|| JsValue::from_str("missing document"))
}

fn set_text(id: &str, text: &str) -> Result<(), JsValue> {
    let doc = document()?;
    if let Some(element) = doc.get_element_by_id(id) {
        element.set_text_content(Some(text));
    }
    Ok(())
}

fn set_html(id: &str, html: &str) -> Result<(), JsValue> {
    let doc = document()?;
    if let Some(element) = doc.get_element_by_id(id) {
        element.set_inner_html(html);
    }
    Ok(())
}

fn read_failures() -> Result<String, JsValue> {
    let doc: HtmlDocument = document()?.dyn_into()?;
    Ok(client::read_cookie(&doc.cookie()?, FAILURES_COOKIE))
}

fn apply_failure_image(failures: &str) -> Result<(), JsValue> {
    let Some(src) = client::failure_image(failures) else {
        return Ok(());
    };
    let doc = document()?;
    if let Some(element) = doc.get_element_by_id(IMAGE_ID) {
        let image: HtmlImageElement = element.dyn_into()?;
        image.set_src(&src);
    }
    Ok(())
}

fn teardown() {
    APP.with(|app| {
        if let Some(app) = &*app.borrow() {
            app.borrow_mut().teardown();
        }
    });
}

/// Every navigation goes through here so the timer never outlives the page.
fn reload() -> Result<(), JsValue> {
    teardown();
    window()
        .ok_or_else(|| JsValue::from_str("missing window"))?
        .location()
        .reload()
}

fn on_tick() -> Result<(), JsValue> {
    match with_app(|app| Ok(app.countdown.tick()))? {
        Tick::Running(remaining) => set_text(TIMER_ID, &remaining.to_string()),
        Tick::Expired => {
            set_text(TIMER_ID, "0")?;
            log::info!("time is up, reloading");
            reload()
        }
        Tick::Stopped => Ok(()),
    }
}

fn start_timer() -> Result<(), JsValue> {
    let interval = Interval::new(TICK_MILLIS, || {
        if let Err(err) = on_tick() {
            console::error_1(&err);
        }
    });
    with_app(|app| {
        app.timer = Some(interval);
        Ok(())
    })
}

async fn fetch_guess(letter: char) -> Result<String, String> {
    let response = Request::get(&client::guess_url(letter))
        .send()
        .await
        .map_err(|err| err.to_string())?;
    if !response.ok() {
        return Err(format!("server answered {}", response.status()));
    }
    response.text().await.map_err(|err| err.to_string())
}

async fn submit_guess(letter: char, key: Element) -> Result<(), JsValue> {
    let response = fetch_guess(letter).await;
    if let Err(reason) = &response {
        log::warn!("guess {letter} went nowhere: {reason}");
    }
    match with_app(|app| Ok(app.gate.finish(response, app.torn_down)))? {
        GuessOutcome::Render { body, .. } => {
            set_html(WORD_ID, &body)?;
            let classes = key.class_list();
            classes.remove_1(KEY_CLASS)?;
            classes.add_1(USED_KEY_CLASS)?;
            reload()
        }
        GuessOutcome::Retry | GuessOutcome::Ignore => Ok(()),
    }
}

fn on_key(key: &Element) -> Result<(), JsValue> {
    let label = key.text_content().unwrap_or_default();
    let Some(letter) = client::guess_letter(&label) else {
        return Ok(());
    };
    if !with_app(|app| Ok(!app.torn_down && app.gate.try_begin(letter)))? {
        log::debug!("ignoring {letter} while another guess is pending");
        return Ok(());
    }
    let key = key.clone();
    spawn_local(async move {
        if let Err(err) = submit_guess(letter, key).await {
            console::error_1(&err);
        }
    });
    Ok(())
}

fn bind_keys() -> Result<(), JsValue> {
    let doc = document()?;
    // The collection is live; keys leave it once marked as used.
    let collection = doc.get_elements_by_class_name(KEY_CLASS);
    let keys: Vec<Element> = (0..collection.length())
        .filter_map(|i| collection.item(i))
        .collect();
    for key in &keys {
        let target = key.clone();
        let closure = Closure::wrap(Box::new(move |_: Event| {
            if let Err(err) = on_key(&target) {
                console::error_1(&err);
            }
        }) as Box<dyn FnMut(_)>);
        key.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    log::debug!("bound {} keys", keys.len());
    Ok(())
}

/// Links and form posts leave the page without going through `reload`.
fn bind_pagehide() -> Result<(), JsValue> {
    let window = window().ok_or_else(|| JsValue::from_str("missing window"))?;
    let closure = Closure::wrap(Box::new(move |_: Event| teardown()) as Box<dyn FnMut(_)>);
    window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn init_app() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::new(log::Level::Info));

    let failures = read_failures()?;
    APP.with(|app| {
        if app.borrow().is_none() {
            *app.borrow_mut() = Some(GameUi::new(failures.clone()));
        }
    });

    bind_keys()?;
    bind_pagehide()?;
    apply_failure_image(&failures)?;
    let remaining = with_app(|app| Ok(app.countdown.remaining()))?;
    set_text(TIMER_ID, &remaining.to_string())?;
    start_timer()
}

#[wasm_bindgen]
pub fn snapshot() -> Result<JsValue, JsValue> {
    with_app(|app| {
        serde_wasm_bindgen::to_value(&app.snapshot())
            .map_err(|err| JsValue::from_str(&err.to_string()))
    })
}

/// Stop the countdown and ignore guesses still in flight, for hosts that
/// navigate without a full reload.
#[wasm_bindgen(js_name = teardown)]
pub fn teardown_ui() {
    teardown();
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    init_app()
}
