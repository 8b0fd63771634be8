//! Offline canned answers used when the inference endpoint is unavailable.
//!
//! Topics are checked in order and the first one with a matching keyword wins.
//! A keyword matches when it starts a word in the lower-cased input; keywords
//! of three characters or fewer (`ai`, `obd`, ...) must match a whole word so
//! that `said` or `maintain` do not count as `ai`.

use super::language::Language;

struct Topic {
    keywords: &'static [&'static str],
    english: &'static str,
    portuguese: &'static str,
}

impl Topic {
    const fn response(&self, language: Language) -> &'static str {
        match language {
            Language::English => self.english,
            Language::Portuguese => self.portuguese,
        }
    }
}

const TOPICS: &[Topic] = &[
    Topic {
        keywords: &[
            "industrial",
            "profibus",
            "profinet",
            "opc-ua",
            "opc ua",
            "modbus",
            "plc",
            "arduino",
            "rj45",
        ],
        english: "🔌 For Profibus integration, check our Arduino libraries and RJ45 adapters. \
                  The industrial connectivity guide has step-by-step setup instructions.",
        portuguese: "🔌 Para integração Profibus, verifique nossas bibliotecas Arduino e adaptadores RJ45. \
                     O guia de conectividade industrial tem instruções passo a passo.",
    },
    Topic {
        keywords: &["automotive", "automotiva", "obd", "vehicle", "veículo", "veiculo", "fleet", "frota"],
        english: "🚗 Our automotive platform supports OBD-II integration with Brazilian compliance \
                  (INMETRO/CONTRAN). See the fleet management documentation.",
        portuguese: "🚗 Nossa plataforma automotiva suporta integração OBD-II com conformidade brasileira \
                     (INMETRO/CONTRAN). Veja a documentação de gestão de frotas.",
    },
    Topic {
        keywords: &["ai", "ia", "ml", "llm", "deepseek", "ollama", "machine learning"],
        english: "🤖 DeepSeek R1/R3 is integrated with Ollama for on-premises AI. \
                  Check the AI integration guide for setup instructions.",
        portuguese: "🤖 DeepSeek R1/R3 está integrado com Ollama para IA local. \
                     Verifique o guia de integração IA para instruções de configuração.",
    },
    Topic {
        keywords: &["compliance", "conformidade", "lgpd", "e-social", "esocial", "fenseg"],
        english: "🇧🇷 Brazilian compliance includes LGPD, E-Social, and FenSeg integration. \
                  See our compliance framework documentation.",
        portuguese: "🇧🇷 Conformidade brasileira inclui LGPD, E-Social e integração FenSeg. \
                     Veja nossa documentação do framework de conformidade.",
    },
    Topic {
        keywords: &["hot", "reload", "elixir", "downtime", "hot-swap"],
        english: "🔥 Hot reloading with Elixir enables zero-downtime deployments. \
                  Check the DevOps guide for implementation details.",
        portuguese: "🔥 Hot reloading com Elixir permite deployments sem downtime. \
                     Verifique o guia DevOps para detalhes de implementação.",
    },
];

const DEFAULT_ENGLISH: &str = "📚 I'd be happy to help! Please check our comprehensive documentation \
     or ask about specific topics like industrial connectivity, automotive integration, \
     AI features, or Brazilian compliance.";

const DEFAULT_PORTUGUESE: &str = "📚 Ficaria feliz em ajudar! Verifique nossa documentação abrangente \
     ou pergunte sobre tópicos específicos como conectividade industrial, integração automotiva, \
     recursos IA ou conformidade brasileira.";

/// Returns the canned answer for `text` in `language`.
///
/// Pure and deterministic: the same input always yields the same string.
pub fn fallback_response(text: &str, language: Language) -> &'static str {
    let lowered = text.to_lowercase();

    TOPICS
        .iter()
        .find(|topic| topic.keywords.iter().any(|kw| contains_keyword(&lowered, kw)))
        .map_or_else(
            || match language {
                Language::English => DEFAULT_ENGLISH,
                Language::Portuguese => DEFAULT_PORTUGUESE,
            },
            |topic| topic.response(language),
        )
}

/// Greeting shown when a chat is opened.
pub const fn welcome_message(language: Language) -> &'static str {
    match language {
        Language::English => {
            "👋 Welcome to illunare 4.0 AI Assistant! I'm here to help you with:\n\n\
             🔌 Industrial connectivity (Profibus/Profinet)\n\
             🚗 Automotive integration & OBD-II\n\
             🤖 AI/ML implementation with DeepSeek\n\
             🇧🇷 Brazilian compliance (LGPD, E-Social, FenSeg)\n\
             🔥 Hot reloading with Elixir\n\
             📊 Architecture & best practices\n\n\
             What would you like to explore today?"
        }
        Language::Portuguese => {
            "👋 Bem-vindo ao Assistente IA illunare 4.0! Estou aqui para ajudar com:\n\n\
             🔌 Conectividade industrial (Profibus/Profinet)\n\
             🚗 Integração automotiva & OBD-II\n\
             🤖 Implementação IA/ML com DeepSeek\n\
             🇧🇷 Conformidade brasileira (LGPD, E-Social, FenSeg)\n\
             🔥 Hot reloading com Elixir\n\
             📊 Arquitetura & melhores práticas\n\n\
             O que você gostaria de explorar hoje?"
        }
    }
}

const QUICK_QUESTIONS_ENGLISH: &[&str] = &[
    "How do I integrate Profibus with illunare?",
    "Show me automotive OBD-II examples",
    "How to deploy with hot reloading?",
    "Brazilian compliance requirements",
];

const QUICK_QUESTIONS_PORTUGUESE: &[&str] = &[
    "Como integro o Profibus com o illunare?",
    "Mostre exemplos automotivos de OBD-II",
    "Como fazer deploy com hot reloading?",
    "Requisitos de conformidade brasileira",
];

/// Suggested starter questions, one per common topic.
pub const fn quick_questions(language: Language) -> &'static [&'static str] {
    match language {
        Language::English => QUICK_QUESTIONS_ENGLISH,
        Language::Portuguese => QUICK_QUESTIONS_PORTUGUESE,
    }
}

fn contains_keyword(haystack: &str, keyword: &str) -> bool {
    let whole_word = keyword.chars().count() <= 3;

    haystack.match_indices(keyword).any(|(start, matched)| {
        let starts_word = haystack[..start]
            .chars()
            .next_back()
            .is_none_or(|c| !c.is_alphanumeric());
        let ends_word = haystack[start + matched.len()..]
            .chars()
            .next()
            .is_none_or(|c| !c.is_alphanumeric());

        starts_word && (!whole_word || ends_word)
    })
}
