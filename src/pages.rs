//! Server-rendered markup. Ids and classes match what `ahorcado_wasm` binds to.

use crate::client::{COUNTDOWN_SECS, IMAGE_ID, KEY_CLASS, TIMER_ID, USED_KEY_CLASS, WORD_ID};
use crate::duel::{seat_name, Duel};
use crate::game::{alphabet, Game};
use crate::stats::GameStats;

const SCRIPT: &str =
    r#"<script type="module">import init from '/pkg/ahorcado_wasm.js'; init();</script>"#;

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html><html lang=\"es\"><head><meta charset=\"utf-8\"><title>{}</title></head><body>{}</body></html>",
        escape(title),
        body
    )
}

pub fn home() -> String {
    layout(
        "Ahorcado",
        "<h1>Ahorcado</h1><ul>\
         <li><a href=\"/ahorcado\">Un jugador</a></li>\
         <li><a href=\"/ahorca2/nuevaPartida\">Dos jugadores</a></li>\
         </ul><a href=\"/login\">Entrar como administrador</a>",
    )
}

/// The word region's content, also returned on its own after each guess.
pub fn word_fragment(game: &Game) -> String {
    escape(&game.masked_word())
}

fn keyboard(game: &Game) -> String {
    let mut keys = String::new();
    for letter in alphabet() {
        let class = if game.tried.contains(&letter) {
            USED_KEY_CLASS
        } else {
            KEY_CLASS
        };
        keys.push_str(&format!("<button type=\"button\" class=\"{class}\">{letter}</button>"));
    }
    format!("<div id=\"teclado\">{keys}</div>")
}

/// What only the admin sees under the board: the word itself and the totals.
fn admin_panel(game: &Game, stats: &GameStats) -> String {
    format!(
        "<div class=\"admin\"><p>Palabra: {}</p>\
         <p>Partidas: {} &middot; Acertadas: {} &middot; Falladas: {}</p>\
         <a href=\"/estadisticas\">Estad&iacute;sticas</a> <a href=\"/logout\">Cerrar sesi&oacute;n</a></div>",
        escape(&game.word),
        stats.games_played,
        stats.words_guessed.len(),
        stats.words_failed.len()
    )
}

/// `admin` carries the totals when the admin is the one playing.
pub fn game(game: &Game, duel: Option<&Duel>, admin: Option<&GameStats>) -> String {
    let mut body = String::from("<h1>Ahorcado</h1>");
    body.push_str(&format!(
        "<img id=\"{IMAGE_ID}\" src=\"/img/0.jpg\" alt=\"ahorcado\">"
    ));
    body.push_str(&format!(
        "<p>Tiempo restante: <span id=\"{TIMER_ID}\">{COUNTDOWN_SECS}</span></p>"
    ));
    body.push_str(&format!("<p class=\"pista\">{}</p>", escape(&game.hint)));

    if game.too_many_failures() {
        body.push_str("<p class=\"finalizar\">Vaya, has perdido. La palabra era:</p>");
        body.push_str(&format!("<p id=\"{WORD_ID}\">{}</p>", escape(&game.word)));
    } else {
        if game.word_discovered() {
            body.push_str("<p class=\"finalizar\">¡Enhorabuena! Palabra correcta</p>");
        }
        body.push_str(&format!("<p id=\"{WORD_ID}\">{}</p>", word_fragment(game)));
    }

    if let Some(duel) = duel {
        body.push_str(&format!(
            "<p class=\"marcador\">{}: {} &middot; {}: {}</p>",
            seat_name(0),
            duel.scores[0],
            seat_name(1),
            duel.scores[1]
        ));
    }

    if game.is_finished() {
        body.push_str("<a href=\"/nuevaPartida\">Nueva partida</a>");
    } else {
        body.push_str(&keyboard(game));
        body.push_str(
            "<form method=\"post\" action=\"/adivinar\">\
             <input name=\"intentoPalabra\" autocomplete=\"off\">\
             <button type=\"submit\">Adivinar palabra</button></form>",
        );
    }
    if let Some(stats) = admin {
        body.push_str(&admin_panel(game, stats));
    }
    body.push_str("<a href=\"/salir\">Salir</a>");
    body.push_str(SCRIPT);
    layout("Ahorcado", &body)
}

/// Form where the duel's setter types the next word.
pub fn duel_form(duel: &Duel) -> String {
    layout(
        "Ahorcado - Dos jugadores",
        &format!(
            "<h1>{}, elige una palabra</h1>\
             <form method=\"post\" action=\"/ahorca2/submit\">\
             <input type=\"password\" name=\"nuevaPalabra\" required>\
             <input name=\"nuevaPista\">\
             <button type=\"submit\">Empezar</button></form>\
             <a href=\"/salir\">Salir</a>",
            seat_name(duel.setter())
        ),
    )
}

pub fn login(failed: bool) -> String {
    let error = if failed {
        "<p class=\"error\">Usuario o contrase&ntilde;a incorrectos</p>"
    } else {
        ""
    };
    layout(
        "Ahorcado - Entrar",
        &format!(
            "<h1>Entrar</h1>{error}\
             <form method=\"post\" action=\"/login\">\
             <input name=\"username\" autocomplete=\"username\">\
             <input type=\"password\" name=\"password\" autocomplete=\"current-password\">\
             <button type=\"submit\">Entrar</button></form>\
             <a href=\"/home\">Volver</a>"
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(escape("<b>\"a\" & 'b'</b>"), "&lt;b&gt;&quot;a&quot; &amp; &#39;b&#39;&lt;/b&gt;");
    }

    #[test]
    fn game_page_carries_script_contract() {
        let mut g = Game::new("CASA", "Lugar donde vives.");
        g.guess_letter('A').unwrap();
        let page = game(&g, None, None);
        assert!(page.contains("id=\"palabra\">_ A _ A</p>"));
        assert!(page.contains("id=\"imagen\" src=\"/img/0.jpg\""));
        assert!(page.contains("<span id=\"tiempo-restante\">10</span>"));
        assert!(page.contains("<button type=\"button\" class=\"letra-oculta\">A</button>"));
        assert!(page.contains("<button type=\"button\" class=\"tecla\">Ñ</button>"));
        assert!(page.contains("/pkg/ahorcado_wasm.js"));
        assert!(!page.contains("marcador"));
        assert!(!page.contains("class=\"admin\""));
    }

    #[test]
    fn lost_game_reveals_word_without_keyboard() {
        let mut g = Game::new("SOL", "");
        for letter in "ABCDEF".chars() {
            g.guess_letter(letter).unwrap();
        }
        let page = game(&g, None, None);
        assert!(page.contains("has perdido"));
        assert!(page.contains("id=\"palabra\">SOL</p>"));
        assert!(!page.contains("class=\"tecla\""));
        assert!(page.contains("/nuevaPartida"));
    }

    #[test]
    fn duel_pages_show_players() {
        let duel = Duel::new();
        let page = game(&Game::new("SOL", "<pista>"), Some(&duel), None);
        assert!(page.contains("Jugador 1: 0"));
        assert!(page.contains("&lt;pista&gt;"));
        assert!(duel_form(&duel).contains("Jugador 2, elige una palabra"));
    }

    #[test]
    fn admin_sees_the_word_and_totals() {
        let mut stats = GameStats::new();
        stats.new_game("SOL");
        let page = game(&Game::new("SOL", ""), None, Some(&stats));
        assert!(page.contains("<p>Palabra: SOL</p>"));
        assert!(page.contains("Partidas: 1"));
        assert!(page.contains("href=\"/logout\""));
    }

    #[test]
    fn login_page_reports_failure() {
        assert!(login(false).contains("action=\"/login\""));
        assert!(!login(false).contains("class=\"error\""));
        assert!(login(true).contains("class=\"error\""));
    }
}
