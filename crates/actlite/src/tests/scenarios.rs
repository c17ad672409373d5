use crate::model::{Cell, Node, OptionalField, Table, TextBlock, Violation};

use super::*;

fn table_act(table: Table) -> Act {
    Act::new(Node::root("root").with_children([Node::table("t", "T")])).with_table("T", table)
}

fn merged_grid() -> Table {
    Table::new(vec![
        vec![Cell::new("A").with_span(1, 2), Cell::spanned(0, 0)],
        vec![Cell::new("C"), Cell::new("D")],
    ])
}

#[test]
fn simple_grid_is_a_pipe_table() {
    let act = table_act(Table::from_rows([["A", "B"], ["C", "D"]]));
    let output = conv(&act, Format::Md);
    assert!(output.contains("| A | B |\n| --- | --- |\n| C | D |\n"));
}

#[test]
fn merged_grid_falls_back_to_positions() {
    let act = table_act(merged_grid());

    let text = conv(&act, Format::Text);
    assert!(text.lines().any(|line| line == "[0,0-1]: A"));
    assert!(!text.contains("| A"));

    let markdown = conv(&act, Format::Md);
    assert!(markdown.lines().any(|line| line == "[0,0-1]: A"));
    assert!(!markdown.contains("| A"));
}

#[cfg(feature = "docx")]
#[test]
fn merged_grid_is_merged_in_docx() {
    use docx_rs::{BuildXML, DocumentChild, TableChild};

    let docx = conv_docx(&table_act(merged_grid()));
    let table = docx
        .document
        .children
        .iter()
        .find_map(|child| match child {
            DocumentChild::Table(table) => Some(table),
            _ => None,
        })
        .unwrap();

    let first_row = table
        .rows
        .iter()
        .map(|child| match child {
            TableChild::TableRow(row) => row,
        })
        .next()
        .unwrap();
    assert_eq!(first_row.cells.len(), 1);

    let xml = String::from_utf8(table.build()).unwrap();
    assert!(xml.contains("gridSpan"));
    assert!(xml.contains(r#"w:val="2""#));
    assert!(xml.contains(">A<"));
}

fn styled_act() -> Act {
    Act::new(Node::root("root").with_children([Node::text_block("t", "TB")])).with_text_block(
        "TB",
        TextBlock::new("<b>im<u>port</u>ant</b> and <i>it<b>al</b>ic</i>"),
    )
}

#[test]
fn adjacent_styled_runs() {
    let act = styled_act();
    assert_eq!(conv(&act, Format::Text), "important and italic\n");

    let markdown = conv(&act, Format::Md);
    assert_eq!(markdown, "**important** and *it**al**ic*\n");
    assert!(!markdown.contains("****"));
}

#[cfg(feature = "docx")]
#[test]
fn adjacent_styled_runs_in_docx() {
    use docx_rs::{DocumentChild, ParagraphChild};

    let docx = conv_docx(&styled_act());
    let [DocumentChild::Paragraph(paragraph)] = docx.document.children.as_slice() else {
        panic!("expected a single paragraph");
    };

    let runs: Vec<(bool, bool, bool)> = paragraph
        .children
        .iter()
        .filter_map(|child| match child {
            ParagraphChild::Run(run) => Some((
                run.run_property.bold.is_some(),
                run.run_property.italic.is_some(),
                run.run_property.underline.is_some(),
            )),
            _ => None,
        })
        .collect();
    assert_eq!(
        runs,
        [
            (true, false, false),
            (true, false, true),
            (true, false, false),
            (false, false, false),
            (false, true, false),
            (true, true, false),
            (false, true, false),
        ]
    );
}

#[test]
fn only_enabled_reason_is_rendered() {
    let disabled = || OptionalField {
        enabled: false,
        content: "hidden".into(),
    };
    let act = Act::new(Node::root("root").with_children([Node::violation("v", "V")]))
        .with_violation(
            "V",
            Violation {
                reasons: OptionalField::filled("X"),
                consequences: disabled(),
                responsible: disabled(),
                recommendations: disabled(),
                ..Default::default()
            },
        );

    let text = conv(&act, Format::Text);
    assert_eq!(text, "Нарушение\nПричины: X\n");

    let markdown = conv(&act, Format::Md);
    assert_eq!(markdown, "**Нарушение**\n\nПричины: X\n");
}

#[test]
fn violation_sections_keep_their_order() {
    use crate::model::{AdditionalContent, AdditionalItem, DescriptionList};

    let violation = Violation {
        violated: "Норма".into(),
        established: "Факт".into(),
        description_list: DescriptionList {
            enabled: true,
            items: vec!["первое".into(), "второе".into()],
        },
        additional_content: AdditionalContent {
            enabled: true,
            items: vec![
                AdditionalItem::free_text("Пояснение", 3),
                AdditionalItem::image("/files/scan.png", "Скан", "", 2),
                AdditionalItem::case("Случай", 1),
            ],
        },
        recommendations: OptionalField::filled("Исправить"),
        ..Default::default()
    };
    let act = Act::new(Node::root("root").with_children([Node::violation("v", "V")]))
        .with_violation("V", violation);

    insta::assert_snapshot!(conv(&act, Format::Text), @r"
    Нарушение
    Нарушено: Норма
    Установлено: Факт
    1. первое
    2. второе
    «Случай»
    Изображение: Скан (scan.png)
    Пояснение
    Рекомендации: Исправить
    ");
}

#[test]
fn special_table_uses_fixed_header() {
    let mut table = Table::from_rows([["x", "y"], ["x", "y"], ["1", "Доля"]]);
    table.is_operational_risk_table = true;
    let output = conv(&table_act(table), Format::Md);

    assert!(output.contains(
        "| № п/п | Риск-событие | Дата выявления | Сумма потерь | Статус | Меры по минимизации |"
    ));
    assert!(output.contains("| 1 | Доля |  |  |  |  |"));
    assert!(!output.contains("| x |"));
}

#[test]
fn regular_risk_table_keeps_its_rows() {
    let mut table = Table::from_rows([["H1", "H2"], ["a", "b"]]);
    table.is_regular_risk_table = true;
    let output = conv(&table_act(table), Format::Md);
    assert!(output.contains("| H1 | H2 |\n| --- | --- |\n| a | b |"));
}

#[test]
fn text_wraps_inside_indent() {
    let words = "слово ".repeat(30);
    let act = Act::new(Node::root("root").with_children([
        Node::item("i", "1", "Раздел").with_children([Node::item("j", "1.1", "Подраздел")
            .with_content(words.trim())]),
    ]));
    let feat = ActliteFeat {
        text_width: 40,
        ..Default::default()
    };
    let output = Actlite::new(&act)
        .with_format(Format::Text)
        .with_feature(feat)
        .render_full()
        .unwrap();

    let text = output.as_str().unwrap();
    let body: Vec<&str> = text.lines().skip(4).collect();
    assert!(body.len() > 1);
    assert!(body.iter().all(|line| line.starts_with("  слово")));
    assert!(body.iter().all(|line| line.chars().count() <= 40));
}
