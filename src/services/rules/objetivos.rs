// Objetivos de conteúdo: cobertura de objetivos sobre os registros de encontros
use crate::models::assessment::{keys, CriterionVerdict};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Registros de conteúdo / encontros numerados
    static ref RECORD_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"registros?\s+de\s+conte[úu]dos?").unwrap(),
        Regex::new(r"conte[úu]dos?\s+program[áa]tic[oa]s?").unwrap(),
        Regex::new(r"\b(?:encontro|aula|sess[ãa]o|reuni[ãa]o)\s*(?:n[º°o]\.?\s*)?\d+").unwrap(),
        Regex::new(r"\b\d+\s*[º°ª]\s*(?:encontro|aula|sess[ãa]o|reuni[ãa]o)").unwrap(),
    ];

    /// Objetivos / propósitos / metas
    static ref OBJECTIVE_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"\bobjetivos?\b").unwrap(),
        Regex::new(r"\bprop[óo]sitos?\b").unwrap(),
        Regex::new(r"\bmetas?\b").unwrap(),
    ];
}

/// Valida se os registros de conteúdo trazem objetivos
///
/// Exige pelo menos um objetivo a cada dois registros. Sem registros detectados,
/// basta um objetivo.
pub fn validate_objetivos_conteudo(text: &str) -> CriterionVerdict {
    let text_lower = text.to_lowercase();

    let records = count_matches(&RECORD_PATTERNS, &text_lower);
    let objectives = count_matches(&OBJECTIVE_PATTERNS, &text_lower);

    let passed = objectives > 0 && (records == 0 || 2 * objectives >= records);

    let details = if passed {
        format!(
            "{} menções a objetivos para {} registros de conteúdo",
            objectives, records
        )
    } else if objectives == 0 {
        format!(
            "Nenhum objetivo encontrado ({} registros de conteúdo)",
            records
        )
    } else {
        format!(
            "Objetivos insuficientes: {} para {} registros de conteúdo (mínimo: {})",
            objectives,
            records,
            records.div_ceil(2)
        )
    };

    CriterionVerdict::new(passed, details)
        .with_count(keys::RECORDS, records as i64)
        .with_count(keys::OBJECTIVES, objectives as i64)
}

fn count_matches(patterns: &[Regex], text: &str) -> usize {
    patterns.iter().map(|re| re.find_iter(text).count()).sum()
}
