use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document as PdfDocument, Object, Stream, StringFormat};
use lrco_review::config::{AnalyzerMode, Config, FailurePolicy};
use lrco_review::models::loaders::{load_all_pdf_files, UploadLimits};
use lrco_review::services::build_analyzer;
use lrco_review::utils::logging;
use lrco_review::{
    BatchOptions, BatchOrchestrator, Decision, DocumentFlow, LocalRuleAnalyzer, PdfTextExtractor,
    TextExtractor,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// 每页一行文本的 PDF
fn create_test_pdf(pages: &[&str]) -> Vec<u8> {
    let mut doc = PdfDocument::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids = Vec::new();
    for text in pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new(
                    "Tj",
                    vec![Object::String(text.as_bytes().to_vec(), StringFormat::Literal)],
                ),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().expect("encode content"),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        });
        kids.push(page_id.into());
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => pages.len() as i64,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("save pdf");
    bytes
}

fn temp_folder(tag: &str) -> PathBuf {
    std::env::temp_dir().join(format!("lrco_it_{}_{}", tag, std::process::id()))
}

#[tokio::test]
async fn test_pdf_extractor_marks_every_page() {
    let bytes = create_test_pdf(&["Registro de classe", "Objetivo: leitura"]);
    let document = lrco_review::Document::new("duas_paginas.pdf", bytes);

    let text = PdfTextExtractor::default().extract(&document).await.unwrap();

    assert!(text.starts_with("\n\n--- Página 1 ---\n"));
    assert!(text.contains("\n\n--- Página 2 ---\n"));
    assert!(!text.contains("--- Página 3 ---"));

    let first = text.find("Registro de classe").expect("page 1 text");
    let second = text.find("Objetivo: leitura").expect("page 2 text");
    let marker = text.find("--- Página 2 ---").unwrap();
    assert!(first < marker && marker < second);
}

#[tokio::test]
async fn test_compliant_pdf_is_approved_by_local_rules() {
    let mut pages = vec![
        "Resolucao 3037/2024 - GS/SEED e Resolucao 7342/2024 - GS/SEED".to_string(),
        "Professor em estagio probatorio, do primeiro ano para o segundo ano".to_string(),
        "Matricula 123456. Frequencia minima atingida".to_string(),
    ];
    for lesson in 1..=22 {
        pages.push(format!(
            "Aula {} em {:02}/04/2024. Objetivo: leitura",
            lesson, lesson
        ));
    }
    let page_refs: Vec<&str> = pages.iter().map(String::as_str).collect();
    let document = lrco_review::Document::new("lrco_completo.pdf", create_test_pdf(&page_refs));

    let flow = Arc::new(DocumentFlow::new(
        Arc::new(PdfTextExtractor::default()),
        Arc::new(LocalRuleAnalyzer),
    ));
    let mut orchestrator = BatchOrchestrator::new(flow, BatchOptions::default());
    let results = orchestrator
        .run_batch(vec![document], "", |_, _, _| {})
        .await
        .unwrap();

    assert_eq!(results[0].decision(), Some(Decision::Approve), "{:?}", results[0]);
}

#[tokio::test]
async fn test_local_batch_from_folder() {
    logging::init(false);

    let folder = temp_folder("local");
    tokio::fs::create_dir_all(&folder).await.unwrap();
    tokio::fs::write(folder.join("b_turma.pdf"), create_test_pdf(&["Aula 1"]))
        .await
        .unwrap();
    tokio::fs::write(folder.join("a_turma.PDF"), create_test_pdf(&["Aula 2"]))
        .await
        .unwrap();
    tokio::fs::write(folder.join("notas.txt"), b"ignorado").await.unwrap();

    let documents = load_all_pdf_files(&folder.to_string_lossy(), &UploadLimits::default())
        .await
        .unwrap();
    assert_eq!(
        documents.iter().map(|d| d.name()).collect::<Vec<_>>(),
        vec!["a_turma.PDF", "b_turma.pdf"]
    );

    let flow = Arc::new(DocumentFlow::new(
        Arc::new(PdfTextExtractor::default()),
        Arc::new(LocalRuleAnalyzer),
    ));
    let options = BatchOptions {
        concurrency_limit: 2,
        pacing_delay: Duration::from_millis(10),
        failure_policy: FailurePolicy::Isolated,
    };
    let mut orchestrator = BatchOrchestrator::new(flow, options);
    let results = orchestrator
        .run_batch(documents, "", |_, _, _| {})
        .await
        .unwrap();

    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r.is_success()));

    tokio::fs::remove_dir_all(&folder).await.unwrap();
}

#[tokio::test]
#[ignore] // 需要网络和 LLM_API_KEY，手动运行：cargo test -- --ignored
async fn test_delegated_analyzer_against_real_service() {
    logging::init(true);

    let mut config = Config::from_env();
    config.analyzer_mode = AnalyzerMode::Delegated;
    let analyzer = build_analyzer(&config).expect("创建评估器失败");

    let flow = Arc::new(DocumentFlow::new(
        Arc::new(PdfTextExtractor::default()),
        analyzer,
    ));
    let mut orchestrator = BatchOrchestrator::new(flow, BatchOptions::from_config(&config));

    let document = lrco_review::Document::new(
        "lrco.pdf",
        create_test_pdf(&["Resolucao 3.037/2024 - GS/SEED", "Objetivo: leitura 01/03/2024"]),
    );
    let results = orchestrator
        .run_batch(vec![document], &config.llm_api_key, |_, _, _| {})
        .await
        .expect("批次运行失败");

    assert_eq!(results.len(), 1);
    assert!(results[0].is_success(), "{:?}", results[0]);
}
