//! Prompt construction for the completion backend.
//!
//! FAQ prompts embed the whole company document and forbid answering from
//! anything else; when the document has no answer the model must send the
//! user to the support contact instead.

use base64::Engine;

use crate::backend::{ChatMessage, CompletionRequest, ContentPart, ImageUrl, MessageContent, Role};
use crate::config::ModelConfig;
use crate::dataset::CompanyFacts;

/// Rule set appended to FAQ prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaqRules {
    /// Short list used by the all-in-one company assistant.
    Brief,
    /// Long list used by the FAQ bot.
    Detailed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageTask {
    Describe,
    DescribeDetailed,
    Diagnose,
}

impl ImageTask {
    fn instructions(&self) -> &'static str {
        match self {
            ImageTask::Describe => DESCRIBE_PROMPT,
            ImageTask::DescribeDetailed => DESCRIBE_DETAILED_PROMPT,
            ImageTask::Diagnose => DIAGNOSE_PROMPT,
        }
    }

    /// (temperature, max_tokens)
    fn sampling(&self) -> (f32, u32) {
        match self {
            ImageTask::Describe | ImageTask::DescribeDetailed => (0.7, 2000),
            ImageTask::Diagnose => (0.3, 2500),
        }
    }
}

const FAQ_TEMPERATURE: f32 = 0.3;
const FAQ_MAX_TOKENS: u32 = 500;

const DESCRIBE_PROMPT: &str = "Describe esta imagen detalladamente en español. Incluye elementos, colores, objetos, acciones y emociones relevantes.";

const DESCRIBE_DETAILED_PROMPT: &str = "Por favor, describe esta imagen de manera detallada y clara en español. \
Incluye todos los elementos importantes que veas, colores, objetos, personas, \
acciones, emociones, y cualquier detalle relevante que puedas observar.";

const DIAGNOSE_PROMPT: &str = "
Eres un técnico especialista en diagnóstico de problemas informáticos. Analiza esta imagen y proporciona:

ANALISIS DEL PROBLEMA:
- Identifica el tipo de problema (pantallazo azul, error de sistema, problema hardware, etc.)
- Describe qué está mostrando la imagen específicamente
- Explica las posibles causas del problema

SOLUCIONES RECOMENDADAS:
Proporciona pasos específicos y prácticos para resolver el problema, organizados por nivel de dificultad:

Solución Básica (Usuario):
1. Primer paso simple que puede hacer cualquier usuario
2. Segundo paso accesible
3. Tercera acción recomendada

Solución Avanzada (Técnico):
1. Pasos para usuarios avanzados
2. Herramientas necesarias
3. Verificaciones técnicas

PRECAUCIONES:
- Advertencias importantes de seguridad
- Riesgos potenciales
- Cuándo contactar a un profesional

PREVENCION:
- Cómo evitar que vuelva a ocurrir
- Mantenimiento recomendado

Responde en español, con un tono profesional pero accesible.
";

/// Builds completion requests for one bot configuration.
pub struct PromptBuilder<'a> {
    models: &'a ModelConfig,
    support_contact: &'a str,
}

impl<'a> PromptBuilder<'a> {
    pub fn new(models: &'a ModelConfig, support_contact: &'a str) -> Self {
        Self { models, support_contact }
    }

    /// Answer `question` from the company document only.
    pub fn faq(&self, facts: &CompanyFacts, rules: FaqRules, question: &str) -> CompletionRequest {
        CompletionRequest {
            model: self.models.chat.clone(),
            messages: vec![
                ChatMessage::text(Role::System, faq_instructions(facts, rules, self.support_contact)),
                ChatMessage::text(Role::User, question),
            ],
            temperature: FAQ_TEMPERATURE,
            max_tokens: FAQ_MAX_TOKENS,
        }
    }

    /// Ask the model to write the bot's welcome message.
    pub fn welcome(&self, facts: &CompanyFacts, rules: FaqRules) -> CompletionRequest {
        let question = format!(
            "Genera un mensaje de bienvenida para el bot de {} que incluya una breve descripcion \
             de la empresa y mencione que pueden hacer cualquier pregunta sobre nuestros servicios.",
            company_name(facts)
        );
        self.faq(facts, rules, &question)
    }

    pub fn image(&self, task: ImageTask, data_uri: String) -> CompletionRequest {
        let (temperature, max_tokens) = task.sampling();
        CompletionRequest {
            model: self.models.vision.clone(),
            messages: vec![ChatMessage {
                role: Role::User,
                content: MessageContent::Parts(vec![
                    ContentPart::Text { text: task.instructions().to_string() },
                    ContentPart::ImageUrl { image_url: ImageUrl { url: data_uri } },
                ]),
            }],
            temperature,
            max_tokens,
        }
    }
}

fn company_name(facts: &CompanyFacts) -> &str {
    facts.name().unwrap_or("la empresa")
}

pub fn faq_instructions(facts: &CompanyFacts, rules: FaqRules, support_contact: &str) -> String {
    let company = company_name(facts);
    let document = facts.rendered();

    match rules {
        FaqRules::Brief => format!(
            "Eres el asistente virtual de {company}. Responde preguntas basándote ÚNICAMENTE en esta información:

{document}

Reglas:
1. Solo información del dataset
2. No inventes datos
3. Si la información no está disponible, dilo y sugiere contactar a {support_contact}
4. No datos sensibles del staff
5. Tono profesional y cercano
6. Sin saludos repetitivos
7. Usa emojis moderadamente
8. Para ejemplos, usar lista completa del dataset
9. Para temas fuera de ámbito, seguir reglas de off_topic_handling
"
        ),
        FaqRules::Detailed => format!(
            "Eres el asistente virtual de {company}. Tu tarea es responder preguntas basándote **ÚNICAMENTE** en la siguiente información de la empresa. Si te preguntan algo que no está en estos datos, indica amablemente que no puedes proporcionar esa información y sugiere contactar directamente con la empresa.

Datos de la empresa:
{document}

Reglas importantes:
1. Solo responde con información que esté en el dataset proporcionado.
2. No inventes ni añadas información adicional.
3. Si la información solicitada no está en el dataset, sugiere contactar a {support_contact}.
4. No respondas preguntas no relacionadas con la empresa.
5. No incluyas en tus respuestas ningún dato sensible como números de teléfono del staff.
   En su lugar debes responder: “No puedo brindar datos sensibles sobre el staff de la empresa.”
6. Sé amable, profesional y utiliza un tono cercano, como entre colegas técnicos.
7. Solo debes saludar en la primera interacción con el usuario. En las siguientes, no repitas saludos.
8. Usa emojis apropiados para hacer las respuestas más amigables, pero sin abusar.
9. **No incluyas saludos como “hola” si la conversación ya está iniciada.**
10. Siempre responde, pero evita redundancias o repeticiones innecesarias.
11. Si el usuario pide ejemplos de páginas, debes proporcionar **la lista completa de URLs** que figura en el dataset.
12. No inventes enlaces: solo comparte URLs que aparezcan en el dataset.
13. NUNCA compartas enlaces que el dataset marque como inactivos o en construcción.
14. No digas que visiten el sitio web general de la empresa para ver ejemplos. Siempre brinda la lista completa que aparece en el dataset.
15. En temas técnicos, prioriza un lenguaje claro y directo, usando terminología profesional (diagnóstico, mantenimiento, falla, revisión, calibración, etc.).
16. Si el usuario hace una pregunta fuera del ámbito de diagnóstico, reparación o mantenimiento, sigue las reglas de “off_topic_handling” del dataset.
17. Si el usuario pide información sobre formación o cursos, responde con la lista de instituciones mencionadas en el dataset.
"
        ),
    }
}

/// Media type from the file signature. Telegram photos are JPEG.
pub fn sniff_image_type(bytes: &[u8]) -> &'static str {
    if bytes.starts_with(&[0x89, b'P', b'N', b'G']) {
        "image/png"
    } else if bytes.starts_with(b"GIF8") {
        "image/gif"
    } else if bytes.len() >= 12 && &bytes[..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        "image/webp"
    } else {
        "image/jpeg"
    }
}

/// `data:` URI for the image, or `None` when there is nothing to encode.
pub fn image_data_uri(bytes: &[u8]) -> Option<String> {
    if bytes.is_empty() {
        return None;
    }
    let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
    Some(format!("data:{};base64,{}", sniff_image_type(bytes), encoded))
}
