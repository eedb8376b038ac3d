use actix_session::{storage::CookieSessionStore, Session, SessionMiddleware};
use actix_web::cookie::{time::Duration, Cookie, Key};
use actix_web::web::{Data, Form, Path};
use actix_web::{
    get, http::header, http::header::ContentType, middleware::Logger, post, web, App,
    HttpResponse, HttpServer, Responder,
};
use ahorcado::client::FAILURES_COOKIE;
use ahorcado::config::Config;
use ahorcado::{pages, Duel, Game, GameStats, Table, TableId, Tables, WordBank};
use parking_lot::Mutex;
use serde::Deserialize;
use std::time::Instant;

const SESSION_COOKIE: &str = "ahorcado";
const TABLE_KEY: &str = "mesa";
const ROLE_KEY: &str = "rol";
const ADMIN_ROLE: &str = "ROLE_ADMIN";

struct State {
    tables: Tables,
    /// Only the admin's games are counted.
    stats: GameStats,
    words: WordBank,
}

impl State {
    fn new() -> State {
        State::with_tables(Tables::new())
    }

    fn with_tables(tables: Tables) -> State {
        State {
            tables,
            stats: GameStats::new(),
            words: WordBank::new(),
        }
    }
}

#[derive(Deserialize)]
struct WordGuess {
    #[serde(rename = "intentoPalabra")]
    attempt: String,
}

#[derive(Deserialize)]
struct DuelWord {
    #[serde(rename = "nuevaPalabra")]
    word: String,
    #[serde(rename = "nuevaPista", default)]
    hint: String,
}

#[derive(Deserialize)]
struct LoginForm {
    username: String,
    password: String,
}

fn failures_cookie(failures: u32) -> Cookie<'static> {
    Cookie::build(FAILURES_COOKIE, failures.to_string())
        .path("/")
        .max_age(Duration::minutes(120))
        .finish()
}

fn redirect(to: &str) -> HttpResponse {
    HttpResponse::Found()
        .append_header((header::LOCATION, to))
        .finish()
}

fn see_other(to: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .append_header((header::LOCATION, to))
        .finish()
}

fn is_admin(session: &Session) -> actix_web::Result<bool> {
    Ok(session.get::<String>(ROLE_KEY)?.as_deref() == Some(ADMIN_ROLE))
}

fn session_table(session: &Session) -> actix_web::Result<Option<TableId>> {
    Ok(session
        .get::<String>(TABLE_KEY)?
        .and_then(|raw| raw.parse::<TableId>().ok()))
}

/// This session's table, if it still exists.
fn current_table<'a>(
    session: &Session,
    tables: &'a mut Tables,
) -> actix_web::Result<Option<(TableId, &'a mut Table)>> {
    let Some(tid) = session_table(session)? else {
        return Ok(None);
    };
    Ok(tables.get_mut(tid, Instant::now()).map(|table| (tid, table)))
}

/// This session's table, opening a new one when it has none or it was dropped.
fn open_table<'a>(
    session: &Session,
    tables: &'a mut Tables,
) -> actix_web::Result<(TableId, &'a mut Table)> {
    let tid = match session_table(session)? {
        Some(tid) if tables.contains(tid) => tid,
        _ => {
            let tid: TableId = rand::random();
            session.insert(TABLE_KEY, tid.to_string())?;
            log::debug!("new table {tid}, {} open", tables.len() + 1);
            tid
        }
    };
    Ok((tid, tables.open(tid, Instant::now())))
}

fn random_game(words: &mut WordBank, stats: Option<&mut GameStats>) -> Game {
    let game = words.new_game(&mut rand::thread_rng());
    if let Some(stats) = stats {
        stats.new_game(&game.word);
    }
    game
}

#[get("/")]
async fn index() -> impl Responder {
    redirect("/home")
}

#[get("/home")]
async fn home() -> impl Responder {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .cookie(failures_cookie(0))
        .body(pages::home())
}

#[get("/login")]
async fn login_form() -> impl Responder {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(pages::login(false))
}

#[post("/login")]
async fn login(
    config: Data<Config>,
    session: Session,
    form: Form<LoginForm>,
) -> actix_web::Result<HttpResponse> {
    let accepted = config
        .admin
        .as_ref()
        .is_some_and(|admin| admin.matches(&form.username, &form.password));
    if !accepted {
        log::warn!("rejected login for {:?}", form.username);
        return Ok(HttpResponse::Unauthorized()
            .content_type(ContentType::html())
            .body(pages::login(true)));
    }
    session.renew();
    session.insert(ROLE_KEY, ADMIN_ROLE)?;
    log::info!("{} logged in as admin", form.username);
    Ok(see_other("/home"))
}

#[get("/logout")]
async fn logout(state: Data<Mutex<State>>, session: Session) -> actix_web::Result<HttpResponse> {
    if let Some(tid) = session_table(&session)? {
        state.lock().tables.close(tid);
    }
    session.purge();
    Ok(HttpResponse::Found()
        .append_header((header::LOCATION, "/login"))
        .cookie(failures_cookie(0))
        .finish())
}

/// Game page for both `/ahorcado` and `/ahorca2`.
async fn play(state: Data<Mutex<State>>, session: Session) -> actix_web::Result<HttpResponse> {
    let admin = is_admin(&session)?;
    let mut guard = state.lock();
    let st = &mut *guard;
    let mut stats = admin.then_some(&mut st.stats);
    let (tid, table) = open_table(&session, &mut st.tables)?;
    if table.settle(stats.as_deref_mut()) {
        log::info!("table {tid} finished a game");
    }
    let game = table
        .game
        .get_or_insert_with(|| random_game(&mut st.words, stats.as_deref_mut()));
    let body = pages::game(game, table.duel.as_ref(), stats.as_deref());
    Ok(HttpResponse::Ok()
        .content_type(ContentType::html())
        .cookie(failures_cookie(game.failures))
        .body(body))
}

#[get("/adivinar/{letra}")]
async fn guess_letter(
    state: Data<Mutex<State>>,
    session: Session,
    path: Path<String>,
) -> actix_web::Result<HttpResponse> {
    let Some(letter) = path.chars().next() else {
        return Ok(HttpResponse::BadRequest().body("no letter"));
    };
    let mut st = state.lock();
    let Some((tid, Table { game: Some(game), .. })) = current_table(&session, &mut st.tables)?
    else {
        return Ok(HttpResponse::NotFound().body("no game"));
    };
    match game.guess_letter(letter) {
        Ok(hit) => log::debug!("table {tid} guessed {letter}: hit={hit}"),
        Err(err) => log::debug!("table {tid} guess {letter} ignored: {err}"),
    }
    Ok(HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(pages::word_fragment(game)))
}

#[post("/adivinar")]
async fn guess_word(
    state: Data<Mutex<State>>,
    session: Session,
    form: Form<WordGuess>,
) -> actix_web::Result<HttpResponse> {
    let mut st = state.lock();
    let Some((tid, table)) = current_table(&session, &mut st.tables)? else {
        return Ok(redirect("/ahorcado"));
    };
    if let Some(game) = &mut table.game {
        if let Err(err) = game.guess_word(&form.attempt) {
            log::debug!("table {tid} word guess ignored: {err}");
        }
    }
    Ok(see_other(if table.duel.is_some() {
        "/ahorca2"
    } else {
        "/ahorcado"
    }))
}

#[get("/nuevaPartida")]
async fn new_game(state: Data<Mutex<State>>, session: Session) -> actix_web::Result<HttpResponse> {
    let admin = is_admin(&session)?;
    let mut guard = state.lock();
    let st = &mut *guard;
    let (_, table) = open_table(&session, &mut st.tables)?;
    if table.duel.is_some() {
        return Ok(redirect("/ahorca2/nuevaPartida"));
    }
    table.start(random_game(&mut st.words, admin.then_some(&mut st.stats)));
    Ok(redirect("/ahorcado"))
}

#[get("/salir")]
async fn exit(state: Data<Mutex<State>>, session: Session) -> actix_web::Result<HttpResponse> {
    if let Some(tid) = session_table(&session)? {
        if state.lock().tables.close(tid).is_some() {
            log::debug!("table {tid} closed");
        }
    }
    session.remove(TABLE_KEY);
    Ok(HttpResponse::Found()
        .append_header((header::LOCATION, "/home"))
        .cookie(failures_cookie(0))
        .finish())
}

#[get("/ahorca2/nuevaPartida")]
async fn duel_form(state: Data<Mutex<State>>, session: Session) -> actix_web::Result<HttpResponse> {
    let mut st = state.lock();
    let (_, table) = open_table(&session, &mut st.tables)?;
    let duel = table.duel.get_or_insert_with(Duel::new);
    Ok(HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(pages::duel_form(duel)))
}

#[post("/ahorca2/submit")]
async fn duel_submit(
    state: Data<Mutex<State>>,
    session: Session,
    form: Form<DuelWord>,
) -> actix_web::Result<HttpResponse> {
    let word = form.word.trim();
    if word.is_empty() || !word.chars().all(char::is_alphabetic) {
        return Ok(see_other("/ahorca2/nuevaPartida"));
    }
    let admin = is_admin(&session)?;
    let mut guard = state.lock();
    let st = &mut *guard;
    let (_, table) = open_table(&session, &mut st.tables)?;
    table.duel.get_or_insert_with(Duel::new);
    let game = Game::new(word, form.hint.trim());
    if admin {
        st.stats.new_game(&game.word);
    }
    table.start(game);
    Ok(see_other("/ahorca2"))
}

#[get("/estadisticas")]
async fn statistics(
    state: Data<Mutex<State>>,
    session: Session,
) -> actix_web::Result<HttpResponse> {
    if !is_admin(&session)? {
        return Ok(HttpResponse::Forbidden().body("admin only"));
    }
    Ok(HttpResponse::Ok().json(&state.lock().stats))
}

/// Plain file names only; anything that could leave the directory is refused.
fn serve_file(config: &Config, dir: &str, name: &str) -> HttpResponse {
    if name.is_empty() || name.starts_with('.') || name.contains(&['/', '\\'][..]) {
        return HttpResponse::NotFound().finish();
    }
    let path = config.static_dir.join(dir).join(name);
    let content_type = match path.extension().and_then(|e| e.to_str()) {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("js") => "application/javascript",
        Some("wasm") => "application/wasm",
        Some("css") => "text/css",
        _ => "application/octet-stream",
    };
    match std::fs::read(&path) {
        Ok(bytes) => HttpResponse::Ok().content_type(content_type).body(bytes),
        Err(err) => {
            log::debug!("{}: {err}", path.display());
            HttpResponse::NotFound().finish()
        }
    }
}

#[get("/img/{file}")]
async fn image(config: Data<Config>, path: Path<String>) -> impl Responder {
    serve_file(&config, "img", &path)
}

#[get("/pkg/{file}")]
async fn package(config: Data<Config>, path: Path<String>) -> impl Responder {
    serve_file(&config, "pkg", &path)
}

fn session_middleware(key: Key) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name(SESSION_COOKIE.to_string())
        .cookie_secure(false)
        .build()
}

fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(index)
        .service(home)
        .service(login_form)
        .service(login)
        .service(logout)
        .route("/ahorcado", web::get().to(play))
        .route("/ahorca2", web::get().to(play))
        .service(guess_letter)
        .service(guess_word)
        .service(new_game)
        .service(exit)
        .service(duel_form)
        .service(duel_submit)
        .service(statistics)
        .service(image)
        .service(package);
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let secret_key = Key::generate();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env();
    let bind = (config.host.clone(), config.port);
    log::info!(
        "listening on http://{}:{}, static files from {}",
        bind.0,
        bind.1,
        config.static_dir.display()
    );

    let data = Data::new(Mutex::new(State::new()));
    let config = Data::new(config);

    HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .app_data(config.clone())
            .wrap(session_middleware(secret_key.clone()))
            .wrap(Logger::new("%r %s"))
            .configure(routes)
    })
    .bind(bind)?
    .run()
    .await
}
