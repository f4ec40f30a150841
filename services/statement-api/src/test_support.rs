//! Fixtures shared by the pipeline and router tests.

use std::path::Path;

use bankdoc_utils::{BankdocError, BankdocResult, ExtractionTemplate, TRANSACTION_MARKER};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

use crate::pdf_processor::TextExtractor;

/// Treats the uploaded bytes as the document's text.
pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract(&self, path: &Path) -> BankdocResult<String> {
        std::fs::read_to_string(path)
            .map_err(|e| BankdocError::extraction(format!("not text: {}", e)))
    }
}

/// Text in the standard statement layout.
pub fn statement_text(contract: &str, period: &str) -> String {
    [
        format!("{:<47}{}", "Выписка по карточному счету сформирована", "15.02.2023"),
        format!("{:<29}{}", "Клиент:", "ИВАНОВ ИВАН"),
        format!("Номер контракта:{}", contract),
        "Номер счета:KZ12345678901234567890".to_string(),
        "Карта:**** 4321".to_string(),
        "Отделение Банка:Алматинский филиал".to_string(),
        "Доступно на 15.02.2023: 120 000,00".to_string(),
        "Основная валюта контракта:KZT".to_string(),
        format!("Период:  {}", period),
        TRANSACTION_MARKER.to_string(),
        "01.01.2023 Покупка -5 000,00 KZT".to_string(),
    ]
    .join("\n")
}

/// Build a PDF with one page per entry, one text line per string. An empty
/// entry gives a page with no text layer.
pub fn build_pdf(pages: &[&[&str]]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for lines in pages {
        let mut operations = Vec::new();
        if !lines.is_empty() {
            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new("Tf", vec!["F1".into(), 10.into()]));
            operations.push(Operation::new("Td", vec![40.into(), 800.into()]));
            for (i, line) in lines.iter().enumerate() {
                if i > 0 {
                    operations.push(Operation::new("Td", vec![0.into(), (-12).into()]));
                }
                operations.push(Operation::new("Tj", vec![Object::string_literal(*line)]));
            }
            operations.push(Operation::new("ET", vec![]));
        }

        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

/// The standard layout in ASCII, padded with dots, for PDFs built with
/// [`build_pdf`]. Pair it with [`ascii_template`].
pub fn ascii_statement_lines(contract: &str, period: &str) -> Vec<String> {
    vec![
        format!("{:.<47}{}", "STATEMENT", "15.02.2023"),
        format!("{:.<29}{}", "CLIENT", "IVANOV.IVAN"),
        format!("{:.<16}{}", "CONTRACT", contract),
        format!("{:.<12}{}", "ACCOUNT", "KZ1234567890"),
        format!("{:.<6}{}", "CARD", "4321"),
        format!("{:.<16}{}", "BRANCH", "ALMATY"),
        "AVAILABLE.120000.00".to_string(),
        format!("{:.<26}{}", "CURRENCY", "KZT"),
        format!("{:.<9}{}", "PERIOD", period),
        "OPERATIONS".to_string(),
        "01.01.2023;PURCHASE;-5000.00".to_string(),
    ]
}

/// The standard offsets with an ASCII transaction marker.
pub fn ascii_template() -> ExtractionTemplate {
    ExtractionTemplate::standard()
        .rules()
        .iter()
        .fold(ExtractionTemplate::new("ascii", "OPERATIONS"), |template, rule| {
            template.with_rule(rule.field, rule.line, rule.offset)
        })
}
