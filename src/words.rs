use rand::seq::SliceRandom;
use rand::Rng;

use crate::game::Game;

/// Word and hint pairs for single-player games.
pub const WORDS: &[(&str, &str)] = &[
    ("CASA", "Lugar donde vives."),
    ("PERRO", "Un amigo de cuatro patas."),
    ("GATO", "Un felino doméstico."),
    ("FLOR", "Una planta que suele ser colorida."),
    ("COCHE", "Medio de transporte con cuatro ruedas."),
    ("SOL", "La estrella que brilla en el cielo durante el día."),
    ("LUNA", "El satélite natural de la Tierra."),
    ("MAR", "Gran extensión de agua salada."),
    ("MONTAÑA", "Elevación natural del terreno."),
    ("RIO", "Agua que fluye continuamente."),
    ("MESA", "Mueble utilizado para poner objetos."),
    ("SILLA", "Asiento con respaldo para sentarse."),
    ("VENTANA", "Abertura en la pared para ver afuera."),
    ("PUERTA", "Permite entrar o salir de un espacio."),
    ("JARDIN", "Área con plantas y flores."),
    ("CIELO", "La atmósfera sobre la Tierra durante el día."),
    ("TIERRA", "Nuestro planeta."),
    ("AIRE", "Lo que respiramos."),
    ("FUEGO", "Elemento que puede arder."),
    ("AGUA", "Esencial para la vida."),
    ("MANZANA", "Una fruta roja y jugosa."),
    ("PLATANO", "Una fruta amarilla y alargada."),
    ("UVA", "Pequeñas frutas verdes o moradas."),
    ("NARANJA", "Una fruta cítrica de color naranja."),
    ("LIMON", "Una fruta cítrica amarilla."),
    ("KIWI", "Una fruta pequeña y verde con semillas negras."),
    ("SANDIA", "Una fruta grande, verde por fuera y roja por dentro."),
    ("FRESA", "Pequeña fruta roja y dulce."),
    ("PIÑA", "Una fruta tropical con una cáscara dura y escamosa."),
    ("MELOCOTON", "Una fruta jugosa con una piel aterciopelada."),
    ("LIBRO", "Un objeto con páginas que se lee para aprender o entretenerse."),
    ("PAPEL", "Hoja fina utilizada para escribir o imprimir."),
    ("LAPICERO", "Un instrumento para escribir o dibujar."),
    ("TIJERAS", "Se utilizan para cortar papel o tela."),
    ("PEGAMENTO", "Se utiliza para unir objetos."),
    ("GOMA", "Un objeto elástico para borrar lápiz."),
    ("PIZARRA", "Superficie en la que se puede escribir o dibujar con tiza."),
    ("MAESTRO", "Persona que enseña a otros."),
    ("ESCUELA", "Lugar donde se aprende y se educa."),
    ("ALUMNO", "Persona que estudia en la escuela."),
    ("AMIGO", "Una persona con la que tienes una relación cercana."),
    ("FAMILIA", "El grupo de personas con la que tienes lazos familiares."),
    ("PADRE", "Un progenitor masculino."),
    ("MADRE", "Una progenitora femenina."),
    ("HERMANO", "Hijo de tus padres."),
    ("HERMANA", "Hija de tus padres."),
    ("ABUELO", "El padre de uno de tus padres."),
    ("ABUELA", "La madre de uno de tus padres."),
    ("TIO", "El hermano de uno de tus padres."),
    ("TIA", "La hermana de uno de tus padres."),
    ("COMIDA", "Alimento que se consume durante el día."),
    ("CENA", "La última comida del día."),
    ("DESAYUNO", "La primera comida del día."),
    ("TELEVISOR", "Este dispositivo muestra programas y películas."),
    ("PANTALLA", "Se utiliza para ver imágenes en dispositivos electrónicos."),
    ("SOMBRILLA", "Te protege del sol en la playa o en un día lluvioso."),
    ("VENTILADOR", "Proporciona aire fresco en días calurosos."),
    ("CUBIERTOS", "Utensilios de mesa que incluyen cuchillo, tenedor y cuchara."),
    ("RELOJ", "Te dice la hora en cualquier momento del día."),
    ("CALENDARIO", "Te ayuda a realizar un seguimiento de fechas importantes y eventos."),
    ("MONITOR", "La pantalla de una computadora o dispositivo similar."),
    ("TELEFONO", "Puedes hacer llamadas y enviar mensajes con este dispositivo."),
    ("COMPUTADORA", "Una máquina que te permite realizar tareas digitales."),
    ("ESPEJO", "Te muestra tu propio reflejo."),
    ("CUCHARA", "Se usa para servir alimentos líquidos o para comer."),
    ("TENEDOR", "Ayuda a comer alimentos sólidos y a pincharlos."),
    ("CUCHILLO", "Un utensilio afilado para cortar alimentos."),
    ("ESCALERA", "La usas para subir o bajar de un lugar elevado."),
];

/// Hands out words without repeating one until every word has been played.
#[derive(Debug, Default, Clone)]
pub struct WordBank {
    played: Vec<&'static str>,
}

impl WordBank {
    pub fn new() -> WordBank {
        WordBank::default()
    }

    pub fn pick<R: Rng + ?Sized>(&mut self, rng: &mut R) -> (&'static str, &'static str) {
        if self.played.len() >= WORDS.len() {
            log::debug!("every word played, clearing history");
            self.played.clear();
        }
        let fresh: Vec<&(&str, &str)> = WORDS
            .iter()
            .filter(|(word, _)| !self.played.contains(word))
            .collect();
        let &&(word, hint) = fresh.choose(rng).unwrap_or(&&WORDS[0]);
        self.played.push(word);
        (word, hint)
    }

    /// Start a game on a fresh random word.
    pub fn new_game<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Game {
        let (word, hint) = self.pick(rng);
        Game::new(word, hint)
    }

}
