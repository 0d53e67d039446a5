//! Per-mode behaviour: routing table, prompts, notices and fixed texts.

use crate::bot::empathy::EmpathyTable;
use crate::bot::event::ContentKind;
use crate::bot::prompt::{FaqRules, ImageTask};
use crate::bot::router::{Handler, Router, StaticReply};
use crate::config::BotMode;

/// Fixed texts sent when a path cannot produce its normal reply.
#[derive(Debug, Clone, Copy)]
pub struct Fallbacks {
    pub query_failed: &'static str,
    /// Completion failure after a voice note was transcribed.
    pub voice_query_failed: &'static str,
    pub transcription_failed: &'static str,
    pub image_download_failed: &'static str,
    /// The download succeeded but there was nothing to encode.
    pub image_unreadable: &'static str,
    pub image_failed: &'static str,
    pub welcome_failed: &'static str,
    pub dataset_missing: &'static str,
    pub sentiment_failed: &'static str,
}

const DEFAULT_FALLBACKS: Fallbacks = Fallbacks {
    query_failed: "Error al procesar tu consulta. Intenta nuevamente.",
    voice_query_failed: "Error al procesar tu consulta.",
    transcription_failed: "No pude transcribir el audio. Intenta de nuevo.",
    image_download_failed: "Error al procesar la imagen.",
    image_unreadable: "Error al procesar la imagen.",
    image_failed: "No pude analizar la imagen.",
    welcome_failed: "Error al generar el mensaje de bienvenida. Por favor, intente mas tarde.",
    dataset_missing: "Error al cargar los datos de la empresa. Por favor, intente mas tarde.",
    sentiment_failed: "Hubo un error al analizar tu mensaje. Intenta de nuevo.",
};

pub struct BotProfile {
    pub router: Router,
    pub faq_rules: FaqRules,
    pub image_task: ImageTask,
    /// Short-circuit strongly emotional text to a canned reply before the FAQ.
    pub sentiment_gate: bool,
    /// Prefix of the transcript notice sent before answering a voice note.
    pub transcript_echo: Option<&'static str>,
    pub empathy: Option<EmpathyTable>,
    pub photo_ack: Option<&'static str>,
    pub photo_heading: &'static str,
    pub fallbacks: Fallbacks,
}

impl BotProfile {
    pub fn for_mode(mode: BotMode) -> Self {
        match mode {
            BotMode::Corporate => Self::corporate(),
            BotMode::Faq => Self::faq(),
            BotMode::Describe => Self::describe(),
            BotMode::Diagnose => Self::diagnose(),
            BotMode::Empathy => Self::empathy(),
        }
    }

    fn corporate() -> Self {
        let router = Router::new(corporate::WELCOME)
            .command("start", "Mensaje de bienvenida", Handler::Static(corporate::WELCOME))
            .command("help", "Ayuda y funcionalidades", Handler::Static(corporate::WELCOME))
            .command("corporativo", "Modo consultas empresariales", Handler::Static(corporate::CORPORATE))
            .command("emocional", "Modo soporte emocional", Handler::Static(corporate::EMOTIONAL))
            .content(ContentKind::Text, Handler::Query)
            .content(ContentKind::Voice, Handler::Voice)
            .content(ContentKind::Photo, Handler::Photo);

        Self {
            router,
            faq_rules: FaqRules::Brief,
            image_task: ImageTask::Describe,
            sentiment_gate: true,
            transcript_echo: Some("📝 Transcripción: "),
            empathy: Some(EmpathyTable::CORPORATE),
            photo_ack: None,
            photo_heading: "🖼️ Descripción de la imagen:\n\n",
            fallbacks: DEFAULT_FALLBACKS,
        }
    }

    fn faq() -> Self {
        let router = Router::new(faq::CAPABILITIES)
            .command("start", "Bienvenida", Handler::GeneratedWelcome)
            .content(ContentKind::Text, Handler::Query)
            .content(ContentKind::Voice, Handler::Voice);

        Self {
            router,
            faq_rules: FaqRules::Detailed,
            image_task: ImageTask::Describe,
            sentiment_gate: false,
            transcript_echo: None,
            empathy: None,
            photo_ack: None,
            photo_heading: "",
            fallbacks: Fallbacks {
                query_failed: faq::QUERY_FAILED,
                voice_query_failed: faq::QUERY_FAILED,
                transcription_failed: "❌ Lo siento, no pude transcribir el audio. Por favor, intenta de nuevo.",
                ..DEFAULT_FALLBACKS
            },
        }
    }

    fn describe() -> Self {
        let router = Router::new(describe::IMAGES_ONLY)
            .command("start", "Iniciar el bot", Handler::Static(describe::WELCOME))
            .command("help", "Mostrar la ayuda", Handler::Static(describe::HELP))
            .content(ContentKind::Photo, Handler::Photo);

        Self {
            router,
            faq_rules: FaqRules::Brief,
            image_task: ImageTask::DescribeDetailed,
            sentiment_gate: false,
            transcript_echo: None,
            empathy: None,
            photo_ack: Some("📸 He recibido tu imagen. Analizándola... ⏳"),
            photo_heading: "🤖 Descripción de la imagen:\n\n",
            fallbacks: Fallbacks {
                image_download_failed: "❌ Ocurrió un error al procesar tu imagen. Intenta de nuevo.",
                image_unreadable: "❌ Error al procesar la imagen. Intenta de nuevo.",
                image_failed: "❌ No pude analizar la imagen. Por favor, intenta con otra imagen.",
                ..DEFAULT_FALLBACKS
            },
        }
    }

    fn diagnose() -> Self {
        let router = Router::new(diagnose::GUIDANCE)
            .command("start", "Iniciar el asistente", Handler::Static(diagnose::WELCOME))
            .command("help", "Qué imágenes puedo analizar", Handler::Static(diagnose::HELP))
            .command("ejemplos", "Ejemplos de problemas", Handler::Static(diagnose::EXAMPLES))
            .content(ContentKind::Photo, Handler::Photo);

        Self {
            router,
            faq_rules: FaqRules::Brief,
            image_task: ImageTask::Diagnose,
            sentiment_gate: false,
            transcript_echo: None,
            empathy: None,
            photo_ack: Some("Imagen recibida. Analizando el problema técnico..."),
            photo_heading: "DIAGNOSTICO TECNICO\n\n",
            fallbacks: Fallbacks {
                image_download_failed: "Error en el analisis. Ocurrio un problema al procesar tu imagen. \
                                        Por favor, intenta con otra imagen o más tarde.",
                image_unreadable: "Error al procesar la imagen. Por favor, intenta enviar la imagen nuevamente.",
                image_failed: "No pude analizar la imagen. Por favor, asegurate de que la imagen sea clara \
                               y muestre el problema técnico visiblemente.",
                ..DEFAULT_FALLBACKS
            },
        }
    }

    fn empathy() -> Self {
        let router = Router::new(empathy::WELCOME)
            .command("start", "Empezar", Handler::Static(empathy::WELCOME))
            .command("help", "Cómo funciona", Handler::Static(empathy::WELCOME))
            .content(ContentKind::Text, Handler::Empathy);

        Self {
            router,
            faq_rules: FaqRules::Brief,
            image_task: ImageTask::Describe,
            sentiment_gate: false,
            transcript_echo: None,
            empathy: Some(EmpathyTable::COMPANION),
            photo_ack: None,
            photo_heading: "",
            fallbacks: DEFAULT_FALLBACKS,
        }
    }
}

mod corporate {
    use super::StaticReply;

    pub const WELCOME: StaticReply = StaticReply::html(
        "<b>Bienvenido al Asistente TecnoMant</b>

Soy tu asistente multifuncional con estas capacidades:

<b>Asistente Corporativo</b> - Consultas sobre TecnoMant
<b>Soporte Emocional</b> - Análisis de sentimientos
<b>Procesamiento de Voz</b> - Transcripción de audio
<b>Análisis de Imágenes</b> - Descripción detallada

<b>Comandos disponibles:</b>
/start - Este mensaje de bienvenida
/help - Ayuda y funcionalidades
/corporativo - Modo consultas empresariales
/emocional - Modo soporte emocional

<b>¡Simplemente escribe o envía lo que necesites!</b>",
    );

    pub const CORPORATE: StaticReply = StaticReply::html(
        "<b>Modo Corporativo Activado</b>

Ahora puedes hacerme preguntas sobre:
• Servicios de TecnoMant
• Información de la empresa
• Precios y planes
• Proyectos actuales
• Contacto y ubicación

¿En qué puedo ayudarte hoy?",
    );

    pub const EMOTIONAL: StaticReply = StaticReply::html(
        "<b>Modo Soporte Emocional Activado</b>

Compartí cómo te sentís y te acompañaré con:
• Empatía y comprensión
• Consejos prácticos
• Apoyo motivacional
• Escucha activa

¿Cómo estás hoy?",
    );
}

mod faq {
    use super::StaticReply;

    pub const CAPABILITIES: StaticReply = StaticReply::plain(
        "Puedo responder consultas sobre la empresa por mensaje de texto o de voz. \
         Usa /start para ver la bienvenida.",
    );

    pub const QUERY_FAILED: &str = "❌ Lo siento, hubo un error al procesar tu consulta ❌.

Por favor, intenta nuevamente más tarde.";
}

mod describe {
    use super::StaticReply;

    pub const WELCOME: StaticReply = StaticReply::html(
        "¡Hola! 👋 Soy un bot que puede describir imágenes para ti.

🖼️ <b>¿Cómo funciono?</b>
Simplemente envíame una imagen y yo te daré una descripción detallada de lo que veo.

🤖 <b>Tecnología:</b>
Utilizo Groq AI para analizar las imágenes y generar descripciones precisas.

📸 <b>¡Pruébame!</b>
Envía cualquier imagen y verás lo que puedo hacer.

Para obtener ayuda, usa el comando /help",
    );

    pub const HELP: StaticReply = StaticReply::html(
        "🔧 <b>Comandos disponibles:</b>

/start - Iniciar el bot
/help - Mostrar esta ayuda

📸 <b>¿Cómo usar el bot?</b>

1. Envía una imagen (foto, dibujo, captura, etc.)
2. Espera unos segundos mientras proceso la imagen
3. Recibirás una descripción detallada de lo que veo

💡 <b>Consejos:</b>
- Las imágenes más claras y nítidas generan mejores descripciones
- Puedo analizar fotos, dibujos, gráficos, capturas de pantalla, etc.
- Respondo en español siempre

❓ <b>¿Problemas?</b>
Si algo no funciona, intenta enviar la imagen de nuevo.",
    );

    pub const IMAGES_ONLY: StaticReply = StaticReply::html(
        "📝 Solo puedo procesar imágenes por ahora.

📸 <b>Envía una imagen</b> y te daré una descripción detallada de ella.

💡 Usa /help para ver todos los comandos disponibles.",
    );
}

mod diagnose {
    use super::StaticReply;

    pub const WELCOME: StaticReply = StaticReply::plain(
        "Hola! Soy tu Asistente Técnico de Diagnóstico

Como funciono?
Enviamé una imagen de cualquier problema técnico y te ayudaré a diagnosticarlo:
- Pantallazos azules
- Mensajes de error
- Problemas de hardware
- Fallos del sistema

Que recibiras:
- Analisis profesional del problema
- Soluciones paso a paso
- Niveles de dificultad
- Precauciones importantes

Envía una imagen de tu problema técnico y empecemos!

Usa /help para más información",
    );

    pub const HELP: StaticReply = StaticReply::plain(
        "Asistente Técnico de Diagnóstico

Que tipos de imágenes puedo analizar?
- Pantallazos azules (BSOD)
- Mensajes de error del sistema
- Problemas de hardware visibles
- Fallos de arranque
- Errores de aplicaciones
- Luces indicadoras de dispositivos

Proceso de analisis:
1. Envía la imagen del problema
2. Analizo visualmente el error
3. Identifico las posibles causas
4. Proporciono soluciones paso a paso

Niveles de solucion:
- Basico (para cualquier usuario)
- Avanzado (para técnicos)
- Profesional (cuando contactar expertos)

Importante:
Este es un asistente de diagnóstico. Para problemas críticos siempre recomiendo contactar con un técnico profesional.

Envía tu imagen y empecemos!",
    );

    pub const EXAMPLES: StaticReply = StaticReply::plain(
        "Ejemplos de problemas que puedo analizar:

Pantallazos Azules:
- Códigos de error STOP
- Mensajes de sistema corrupto
- Fallos de drivers

Errores de Sistema:
- Mensajes de aplicación fallida
- Problemas de arranque
- Errores de Windows/Linux/Mac

Hardware Visible:
- Luces de error en dispositivos
- Pantallas de diagnóstico
- Códigos POST

Problemas de Software:
- Mensajes de error específicos
- Fallos de instalación
- Conflictos de programas

No dudes en enviar cualquier imagen de problema técnico!",
    );

    pub const GUIDANCE: StaticReply = StaticReply::plain(
        "Asistente Técnico de Diagnóstico

Para recibir ayuda con un problema técnico, envía una imagen del problema:
- Pantallazo azul
- Mensaje de error
- Problema visible de hardware
- Cualquier fallo del sistema

Consejo: Asegurate de que la imagen sea clara y se vea bien el texto/error.

Usa /help para ver todos los comandos disponibles
Usa /ejemplos para ver tipos de problemas que puedo analizar",
    );
}

mod empathy {
    use super::StaticReply;

    pub const WELCOME: StaticReply = StaticReply::plain(
        "¡Hola! Soy tu bot que te acompaña emocionalmente
Escribi como te sentis y te voy a responder con un mensaje amigable.

Ejemplos:
- 'Estoy re feliz hoy'
- 'No tengo ganas de nada'
- 'Hoy fue un día normal'",
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bot::event::Content;

    const MODES: [BotMode; 5] = [
        BotMode::Corporate,
        BotMode::Faq,
        BotMode::Describe,
        BotMode::Diagnose,
        BotMode::Empathy,
    ];

    fn command(name: &str) -> Content {
        Content::Command { name: name.into() }
    }

    #[test]
    fn test_every_mode_has_start() {
        for mode in MODES {
            let profile = BotProfile::for_mode(mode);
            assert!(profile.router.commands().iter().any(|c| c.name == "start"), "{mode}");
        }
    }

    #[test]
    fn test_corporate_routes() {
        let router = BotProfile::for_mode(BotMode::Corporate).router;
        assert_eq!(router.route(&command("corporativo")), &Handler::Static(corporate::CORPORATE));
        assert_eq!(router.route(&command("emocional")), &Handler::Static(corporate::EMOTIONAL));
        assert_eq!(router.route(&Content::Text("hola".into())), &Handler::Query);
        assert_eq!(router.route(&Content::Photo { file_id: "p".into(), size: 1 }), &Handler::Photo);
        assert_eq!(router.route(&command("desconocido")), &Handler::Static(corporate::WELCOME));
    }

    #[test]
    fn test_faq_start_is_generated() {
        let profile = BotProfile::for_mode(BotMode::Faq);
        assert_eq!(profile.router.route(&command("start")), &Handler::GeneratedWelcome);
        assert_eq!(profile.router.route(&command("help")), &Handler::Static(faq::CAPABILITIES));
        assert!(profile.transcript_echo.is_none());
        assert!(!profile.sentiment_gate);
    }

    #[test]
    fn test_image_bots_ignore_text() {
        for mode in [BotMode::Describe, BotMode::Diagnose] {
            let profile = BotProfile::for_mode(mode);
            assert!(matches!(profile.router.route(&Content::Text("hola".into())), Handler::Static(_)));
            assert_eq!(profile.router.route(&Content::Photo { file_id: "p".into(), size: 1 }), &Handler::Photo);
            assert!(profile.photo_ack.is_some());
        }
    }

    #[test]
    fn test_empathy_routes_text() {
        let profile = BotProfile::for_mode(BotMode::Empathy);
        assert_eq!(profile.router.route(&Content::Text("estoy triste".into())), &Handler::Empathy);
        assert!(profile.empathy.is_some());
    }
}
