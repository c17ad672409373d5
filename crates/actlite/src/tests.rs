mod scenarios;

use super::*;
use crate::model::Cell;

/// An act as the storage layer hands it over, including a stringified
/// formatting field and a dangling table reference.
const ACT: &str = r#"{
  "tree": {
    "id": "root",
    "type": "item",
    "children": [
      {
        "id": "i4", "type": "item", "number": "4",
        "label": "Общие сведения", "content": "Проверка проведена."
      },
      {
        "id": "i5", "type": "item", "number": "5", "label": "Результаты",
        "children": [
          {
            "id": "i51", "type": "item", "number": "5.1", "label": "Доступ",
            "children": [
              { "id": "n-t1", "type": "table", "tableId": "T1" },
              {
                "id": "i511", "type": "item", "number": "5.1.1", "label": "Учётные записи",
                "children": [{ "id": "n-v1", "type": "violation", "violationId": "V1" }]
              }
            ]
          },
          { "id": "n-tb", "type": "textblock", "textBlockId": "TB1" },
          { "id": "n-dangling", "type": "table", "tableId": "missing" }
        ]
      }
    ]
  },
  "tables": {
    "T1": {
      "grid": [
        [{ "content": "A" }, { "content": "B" }],
        [{ "content": "C" }, { "content": "D" }]
      ]
    }
  },
  "textBlocks": {
    "TB1": {
      "content": "Итог: <b>важно</b>",
      "formatting": "{\"alignment\":\"justify\",\"bold\":true}"
    }
  },
  "violations": {
    "V1": {
      "violated": "Пункт 3.2",
      "established": "",
      "reasons": { "enabled": true, "content": "X" },
      "consequences": { "enabled": false, "content": "hidden" }
    }
  }
}"#;

fn fixture() -> Act {
    Act::from_json(ACT).unwrap()
}

fn conv(act: &Act, format: Format) -> String {
    match render_full(act, format) {
        Ok(output) => output.as_str().unwrap_or_default().to_owned(),
        Err(err) => format!("failed to render: {err}"),
    }
}

#[cfg(feature = "docx")]
fn conv_docx(act: &Act) -> docx_rs::Docx {
    match render_full(act, Format::Docx).unwrap() {
        Output::Docx(docx) => *docx,
        _ => unreachable!(),
    }
}

#[test]
fn full_text() {
    insta::assert_snapshot!(conv(&fixture(), Format::Text), @r"
    4 Общие сведения

    Проверка проведена.

    5 Результаты

      5.1 Доступ

        Таблица (п. 5.1)
        +---+---+
        | A | B |
        +===+===+
        | C | D |
        +---+---+

        5.1.1 Учётные записи

          Нарушение (п. 5.1.1)
          Нарушено: Пункт 3.2
          Причины: X

      Итог: важно
    ");
}

#[test]
fn full_markdown() {
    insta::assert_snapshot!(conv(&fixture(), Format::Md), @r#"
    # 4 Общие сведения

    Проверка проведена.

    # 5 Результаты

    ## 5.1 Доступ

    **Таблица (п. 5.1)**

    | A | B |
    | --- | --- |
    | C | D |

    ### 5.1.1 Учётные записи

    **Нарушение (п. 5.1.1)**

    Нарушено: Пункт 3.2

    Причины: X

    <div align="justify">

    **Итог: важно**

    </div>
    "#);
}

#[cfg(feature = "docx")]
#[test]
fn full_docx() {
    use docx_rs::DocumentChild;

    let docx = conv_docx(&fixture());
    let children = &docx.document.children;
    let tables = children
        .iter()
        .filter(|child| matches!(child, DocumentChild::Table(_)))
        .count();
    // 4 headings, item content, 2 captions, 2 violation fields, the text block
    let paragraphs = children
        .iter()
        .filter(|child| matches!(child, DocumentChild::Paragraph(_)))
        .count();
    assert_eq!(tables, 1);
    assert_eq!(paragraphs, 10);

    let bytes = pack_docx(docx).unwrap();
    assert!(bytes.starts_with(b"PK"));
}

#[test]
fn missing_tree_is_fatal() {
    let err = render_full(&Act::default(), Format::Text).err().unwrap();
    assert_eq!(err.to_string(), "the act has no tree");
}

#[test]
fn broken_satellites_degrade() {
    let act = Act::from_json(
        r#"{
          "tree": { "id": "root", "children": [
            { "id": "t", "type": "table", "tableId": "T", "textBlockId": "B" },
            { "id": "b", "type": "textblock", "tableId": "T" },
            { "id": "x", "type": "chart", "children": [
              { "id": "v", "type": "violation", "violationId": "V" }
            ] }
          ] },
          "tables": { "T": { "grid": "not json" } },
          "violations": { "V": { "reasons": "{broken", "descriptionList": "{\"enabled\":true,\"items\":[\"a\"]}" } }
        }"#,
    )
    .unwrap();

    insta::assert_snapshot!(conv(&act, Format::Text), @r"
    Таблица

    Нарушение
    1. a
    ");
}

#[test]
fn null_fields_fall_back_to_defaults() {
    let act = Act::from_json(
        r#"{
          "tree": { "id": "root", "type": "item", "children": [
            { "id": "i", "type": "item", "number": "1", "label": "Итоги", "content": null,
              "protected": null, "deletable": null, "children": [
                { "id": "t", "type": "table", "tableId": "T" },
                { "id": "v", "type": "violation", "violationId": "V" }
              ] }
          ] },
          "tables": { "T": {
            "isMetricsTable": null,
            "grid": [[{ "content": null, "colSpan": null }, { "content": "B" }]]
          } },
          "textBlocks": null,
          "violations": { "V": { "violated": null, "established": "Факт" } }
        }"#,
    )
    .unwrap();

    let item = &act.tree.as_ref().unwrap().children[0];
    assert_eq!(item.content, "");
    assert!(item.deletable);
    assert_eq!(act.tables["T"].grid[0][0], Cell::default());

    insta::assert_snapshot!(conv(&act, Format::Md), @r"
    # 1 Итоги

    **Таблица (п. 1)**

    |  | B |
    | --- | --- |

    **Нарушение (п. 1)**

    Установлено: Факт
    ");
}

#[test]
fn labels_are_configurable() {
    let feat = ActliteFeat {
        labels: Labels {
            text_block: Some("Text".into()),
            ..Labels::english()
        },
        ..Default::default()
    };
    let act = fixture();
    let output = Actlite::new(&act)
        .with_format(Format::Text)
        .with_feature(feat)
        .render_subtree(&SubtreeQuery::recursive("5"))
        .unwrap();
    let text = output.as_str().unwrap();

    assert!(text.contains("Table (item 5.1)"));
    assert!(text.contains("Violation (item 5.1.1)"));
    assert!(text.contains("Reasons: X"));
    assert!(text.contains("Text (item 5)"));
}
