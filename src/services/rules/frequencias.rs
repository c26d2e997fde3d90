// Frequências: estimativa do total de lançamentos de presença
use crate::models::assessment::{keys, CriterionVerdict};
use lazy_static::lazy_static;
use regex::Regex;

pub const MIN_ATTENDANCE_TOTAL: i64 = 42;
pub const MAX_ATTENDANCE_TOTAL: i64 = 50;

/// Abaixo deste valor a contagem por vocabulário é considerada pouco confiável
const DATE_FALLBACK_THRESHOLD: usize = 20;

lazy_static! {
    /// Vocabulário de frequência/presença.
    /// O marcador de uma letra ("p") gera falsos positivos em qualquer "p" isolado no
    /// texto; é uma limitação conhecida da heurística.
    static ref MARKER_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"\bfrequ[êe]ncias?\b").unwrap(),
        Regex::new(r"\bpresen[çc]as?\b").unwrap(),
        Regex::new(r"\bpresentes?\b").unwrap(),
        Regex::new(r"\bp\b").unwrap(),
    ];

    /// DD/MM/AAAA ou DD-MM-AAAA (dia/mês com 1–2 dígitos, ano com 2–4)
    static ref DATE_PATTERN: Regex =
        Regex::new(r"\b\d{1,2}[/-]\d{1,2}[/-]\d{2,4}\b").unwrap();
}

/// Valida o total de frequências lançadas
pub fn validate_frequencias(text: &str) -> CriterionVerdict {
    let text_lower = text.to_lowercase();

    let markers: usize = MARKER_PATTERNS
        .iter()
        .map(|re| re.find_iter(&text_lower).count())
        .sum();

    let mut total = markers;
    let mut dates = 0;
    let mut counted_by_dates = false;

    if markers < DATE_FALLBACK_THRESHOLD {
        dates = DATE_PATTERN.find_iter(&text_lower).count();
        // cada data corresponde a dois lançamentos
        if 2 * dates > markers {
            total = dates * 2;
            counted_by_dates = true;
        }
    }

    let total = total as i64;
    let problems = attendance_total_problems(total);
    let source = if counted_by_dates {
        format!(" (contagem por datas: {} datas × 2)", dates)
    } else {
        String::new()
    };

    let details = if problems.is_empty() {
        format!(
            "Total de {} frequências{}: número par entre {} e {}",
            total, source, MIN_ATTENDANCE_TOTAL, MAX_ATTENDANCE_TOTAL
        )
    } else {
        format!(
            "Total de {} frequências{} inválido: {}",
            total,
            source,
            problems.join("; ")
        )
    };

    CriterionVerdict::new(problems.is_empty(), details)
        .with_count(keys::TOTAL, total)
        .with_count(keys::MARKERS, markers as i64)
        .with_count(keys::DATES, dates as i64)
}

/// Regras sobre o total: par e dentro de [42, 50]. Retorna os problemas encontrados.
pub fn attendance_total_problems(total: i64) -> Vec<String> {
    let mut problems = Vec::new();
    if total % 2 != 0 {
        problems.push("número ímpar (lançamentos devem ser de 2 em 2)".to_string());
    }
    if total < MIN_ATTENDANCE_TOTAL {
        problems.push(format!("abaixo do mínimo de {}", MIN_ATTENDANCE_TOTAL));
    }
    if total > MAX_ATTENDANCE_TOTAL {
        problems.push(format!("acima do máximo de {}", MAX_ATTENDANCE_TOTAL));
    }
    problems
}
