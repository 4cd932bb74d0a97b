use super::*;
use crate::statute::grammar::Dialect;
use crate::statute::node::NodeKind;

fn parse_kanji(text: &str) -> Vec<StructuralNode> {
    let dialect = Dialect::kanji().unwrap();
    StatuteParser::new(&dialect).parse(text)
}

fn parse_arabic(text: &str) -> Vec<StructuralNode> {
    let dialect = Dialect::arabic().unwrap();
    StatuteParser::new(&dialect).parse(text)
}

fn article_ids(nodes: &[StructuralNode]) -> Vec<String> {
    nodes
        .iter()
        .filter(|node| node.kind() == NodeKind::Article)
        .map(|node| node.number().decimal_id())
        .collect()
}

const KANJI_SAMPLE: &str = "電気設備に関する技術基準を定める省令
電気事業法（昭和三十九年法律第百七十号）第三十九条第一項の規定に基づき、次のように定める。
目次
第一章　総則
第一節　定義（第一条・第二条）
第二章　電気の供給のための電気設備の施設
附則
第一章　総則
第一節　定義
（用語の定義）
第一条　この省令において、次の各号に掲げる用語の定義は、
一　「電路」とは、通常の使用状態で電気が通じているところをいう。
二　「電気機械器具」とは、電路を構成する機械器具をいう。
12
第二条　この省令において使用する用語は、
（電圧の種別等）
第三条　電圧は、次の区分により低圧、高圧及び特別高圧の三種とする。
第二章　電気の供給のための電気設備の施設
（感電、火災等の防止）
第三十七条の二　電気設備は、感電、火災その他人体に危害を及ぼすおそれがないように施設しなければならない。
";

#[test]
fn kanji_text_yields_chapters_and_articles_in_source_order() {
    let nodes = parse_kanji(KANJI_SAMPLE);

    let kinds = nodes.iter().map(|node| node.kind()).collect::<Vec<_>>();
    assert_eq!(
        kinds,
        vec![
            NodeKind::Chapter,
            NodeKind::Article,
            NodeKind::Article,
            NodeKind::Article,
            NodeKind::Chapter,
            NodeKind::Article,
        ]
    );
    assert_eq!(article_ids(&nodes), vec!["1", "2", "3", "37_2"]);
}

#[test]
fn table_of_contents_lines_produce_no_nodes() {
    let nodes = parse_kanji(KANJI_SAMPLE);

    let chapter_titles = nodes
        .iter()
        .filter_map(|node| match node {
            StructuralNode::Chapter { title, .. } => Some(title.as_str()),
            _ => None,
        })
        .collect::<Vec<_>>();

    assert_eq!(
        chapter_titles,
        vec!["総則", "電気の供給のための電気設備の施設"]
    );
}

#[test]
fn bracketed_title_attaches_to_the_next_article_only() {
    let nodes = parse_kanji(KANJI_SAMPLE);

    let titles = nodes
        .iter()
        .filter_map(|node| match node {
            StructuralNode::Article { title, .. } => Some(title.as_deref()),
            _ => None,
        })
        .collect::<Vec<_>>();

    assert_eq!(
        titles,
        vec![
            Some("用語の定義"),
            None,
            Some("電圧の種別等"),
            Some("感電、火災等の防止"),
        ]
    );
}

#[test]
fn article_body_collects_following_lines_and_skips_page_numbers() {
    let nodes = parse_kanji(KANJI_SAMPLE);

    let StructuralNode::Article {
        body_lines,
        chapter,
        section,
        ..
    } = &nodes[1]
    else {
        panic!("expected article, got {:?}", nodes[1]);
    };

    assert_eq!(body_lines.len(), 3);
    assert_eq!(body_lines[0], "この省令において、次の各号に掲げる用語の定義は、");
    assert!(body_lines[2].starts_with("二　"));
    assert_eq!(chapter.as_ref().map(|c| c.value.as_str()), Some("1"));
    assert!(section.is_none());
}

#[test]
fn preamble_lines_never_reach_an_article_body() {
    let nodes = parse_kanji(KANJI_SAMPLE);

    for node in &nodes {
        if let StructuralNode::Article { body_lines, .. } = node {
            assert!(body_lines.iter().all(|line| !line.contains("省令第")));
            assert!(body_lines.iter().all(|line| !line.ends_with("次のように定める。")));
        }
    }
}

#[test]
fn titles_without_a_following_body_are_dropped() {
    let nodes = parse_kanji("（見出しのみ）\n（次の見出し）\n第一条　本文\n");

    assert_eq!(nodes.len(), 1);
    let StructuralNode::Article { title, .. } = &nodes[0] else {
        panic!("expected article");
    };
    assert_eq!(title.as_deref(), Some("次の見出し"));
}

#[test]
fn articles_are_never_emitted_without_body() {
    let samples = [
        KANJI_SAMPLE,
        "第1条\n第2条\n本文\n第3条\n\n",
        "第1条\n\n\n第2章 雑則\n",
        "",
    ];

    for sample in samples {
        for node in parse_kanji(sample).iter().chain(parse_arabic(sample).iter()) {
            if let StructuralNode::Article { body_lines, .. } = node {
                assert!(!body_lines.is_empty());
                assert!(body_lines.iter().any(|line| !line.is_empty()));
            }
        }
    }
}

const ARABIC_SAMPLE: &str = "電気設備の技術基準の解釈
目 次
第1章 総則
第1節 通則
第2章 発電所並びに変電所、開閉所及びこれらに準ずる場所の施設
第1章 総則
第1節 通則
【用語の定義】（省令第1条）
第1条 この解釈において、次の各号に掲げる用語の定義は、当該各号による。
一 使用電圧 電路を代表する線間電圧

電圧の種別	範囲
低圧	600V以下

第2条 削除
第2節 電線
【電線の規格】（省令第6条）
第3条
電線は、次の各号に適合すること。
第37条の2 機械器具の施設
第2章 発電所
第1節 総則
第38条 発電所の施設
";

#[test]
fn arabic_text_emits_sections_with_parent_chapter() {
    let nodes = parse_arabic(ARABIC_SAMPLE);

    let summary = nodes
        .iter()
        .map(|node| format!("{}:{}", node.kind().as_str(), node.number().decimal_id()))
        .collect::<Vec<_>>();

    assert_eq!(
        summary,
        vec![
            "chapter:1",
            "section:1",
            "article:1",
            "article:2",
            "section:2",
            "article:3",
            "article:37_2",
            "chapter:2",
            "section:1",
            "article:38",
        ]
    );

    let StructuralNode::Section { parent_chapter, .. } = &nodes[8] else {
        panic!("expected section");
    };
    assert_eq!(parent_chapter.as_ref().map(|c| c.value.as_str()), Some("2"));
}

#[test]
fn arabic_toc_close_line_is_kept_as_the_first_chapter() {
    let nodes = parse_arabic(ARABIC_SAMPLE);

    let StructuralNode::Chapter { number, title } = &nodes[0] else {
        panic!("expected chapter");
    };
    assert_eq!(number.label, "第1章");
    assert_eq!(title, "総則");
    assert_eq!(
        nodes
            .iter()
            .filter(|node| node.kind() == NodeKind::Chapter)
            .count(),
        2
    );
}

#[test]
fn arabic_articles_keep_inner_blank_lines_but_not_trailing_ones() {
    let nodes = parse_arabic(ARABIC_SAMPLE);

    let StructuralNode::Article {
        body_lines,
        title,
        section,
        ..
    } = &nodes[2]
    else {
        panic!("expected article");
    };

    assert_eq!(title.as_deref(), Some("用語の定義"));
    assert_eq!(section.as_ref().map(|s| s.value.as_str()), Some("1"));
    assert_eq!(
        body_lines,
        &vec![
            "この解釈において、次の各号に掲げる用語の定義は、当該各号による。".to_string(),
            "一 使用電圧 電路を代表する線間電圧".to_string(),
            String::new(),
            "電圧の種別\t範囲".to_string(),
            "低圧\t600V以下".to_string(),
        ]
    );
}

#[test]
fn arabic_article_marker_without_text_opens_an_empty_article() {
    let nodes = parse_arabic(ARABIC_SAMPLE);

    let StructuralNode::Article {
        number,
        body_lines,
        title,
        ..
    } = &nodes[5]
    else {
        panic!("expected article");
    };

    assert_eq!(number.decimal_id(), "3");
    assert_eq!(title.as_deref(), Some("電線の規格"));
    assert_eq!(body_lines, &vec!["電線は、次の各号に適合すること。".to_string()]);
}

#[test]
fn arabic_body_line_starting_with_toc_word_stays_in_the_article() {
    let nodes = parse_arabic(
        "第1章 総則\n第1条 本文の一行目\n目次に掲げる事項は別に定める。\n第2条 二条の本文\n第3条 三条の本文\n",
    );

    assert_eq!(article_ids(&nodes), vec!["1", "2", "3"]);

    let StructuralNode::Article { body_lines, .. } = &nodes[1] else {
        panic!("expected article");
    };
    assert_eq!(
        body_lines,
        &vec![
            "本文の一行目".to_string(),
            "目次に掲げる事項は別に定める。".to_string(),
        ]
    );
}
