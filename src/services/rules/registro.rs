// Registro de avaliação: resoluções, progressão de ano e referências obrigatórias
use crate::models::assessment::{keys, CriterionVerdict};
use lazy_static::lazy_static;
use regex::Regex;

/// Resoluções exigidas: (forma canônica, variantes aceitas)
const REQUIRED_RESOLUTIONS: &[(&str, &[&str])] = &[
    ("3.037/2024", &["3.037/2024", "3037/2024"]),
    ("7.342/2024", &["7.342/2024", "7342/2024"]),
];

const ENROLLMENT_TOKENS: &[&str] = &["matrícula", "matricula"];
const ATTENDANCE_TOKENS: &[&str] = &["frequência", "frequencia"];
const PROBATION_TOKENS: &[&str] = &["estágio probatório", "estagio probatorio"];

lazy_static! {
    /// Cada ano aceita numeral ordinal (1º, 1°, 1ª) ou forma por extenso
    static ref FIRST_YEAR: Regex = Regex::new(r"\b1\s*[º°ª]|\bprimeir[oa]\b").unwrap();
    static ref SECOND_YEAR: Regex = Regex::new(r"\b2\s*[º°ª]|\bsegund[oa]\b").unwrap();
    static ref THIRD_YEAR: Regex = Regex::new(r"\b3\s*[º°ª]|\bterceir[oa]\b").unwrap();

    /// Dias da semana ("segunda-feira") removidos antes de procurar a progressão
    static ref WEEKDAY_PATTERN: Regex =
        Regex::new(r"\b(?:segunda|ter[çc]a|quarta|quinta|sexta)-feira\b").unwrap();
}

/// Valida o registro de avaliação
pub fn validate_registro_avaliacao(text: &str) -> CriterionVerdict {
    let text_lower = text.to_lowercase();

    let found_resolutions: Vec<String> = REQUIRED_RESOLUTIONS
        .iter()
        .filter(|(_, variants)| contains_any(&text_lower, variants))
        .map(|(canonical, _)| canonical.to_string())
        .collect();

    let mut problems = Vec::new();

    for (canonical, variants) in REQUIRED_RESOLUTIONS {
        if !contains_any(&text_lower, variants) {
            problems.push(format!("Resolução {} - GS/SEED não encontrada", canonical));
        }
    }
    if !mentions_year_progression(&text_lower) {
        problems.push("Progressão de ano (1º→2º ou 2º→3º) não mencionada".to_string());
    }
    if !contains_any(&text_lower, ENROLLMENT_TOKENS) {
        problems.push("Referência à matrícula não encontrada".to_string());
    }
    if !contains_any(&text_lower, ATTENDANCE_TOKENS) {
        problems.push("Referência à frequência mínima não encontrada".to_string());
    }
    if !contains_any(&text_lower, PROBATION_TOKENS) {
        problems.push("Referência ao estágio probatório não encontrada".to_string());
    }

    let verdict = if problems.is_empty() {
        CriterionVerdict::new(
            true,
            format!("Resoluções encontradas: {}", found_resolutions.join(", ")),
        )
    } else {
        let lines: Vec<String> = problems.iter().map(|p| format!("- {}", p)).collect();
        CriterionVerdict::new(
            false,
            format!("Problemas encontrados:\n{}", lines.join("\n")),
        )
    };

    verdict.with_labels(keys::FOUND_RESOLUTIONS, found_resolutions)
}

/// Par de anos adjacentes (1º e 2º, ou 2º e 3º) em qualquer posição do texto
fn mentions_year_progression(text_lower: &str) -> bool {
    let text = WEEKDAY_PATTERN.replace_all(text_lower, " ");
    let second = SECOND_YEAR.is_match(&text);
    second && (FIRST_YEAR.is_match(&text) || THIRD_YEAR.is_match(&text))
}

fn contains_any(text: &str, tokens: &[&str]) -> bool {
    tokens.iter().any(|t| text.contains(t))
}
