//! End-to-end layout scenarios through the public API

use script_pager::{
    page_spans, process, tokens_from_json, DualPosition, FormatConfig, LineItem, Paginator, Token,
    TokenKind,
};

fn texts(lines: &[LineItem]) -> Vec<&str> {
    lines.iter().map(|l| l.text.as_str()).collect()
}

fn words(prefix: &str, count: usize) -> String {
    (0..count)
        .map(|i| format!("{prefix}{i:04}"))
        .collect::<Vec<_>>()
        .join(" ")
}

#[test]
fn test_breaks_fall_between_scenes() {
    let mut config = FormatConfig::us_letter();
    config.lines_per_page = 10;
    config.set_width(TokenKind::Action, 10);

    let mut tokens = Vec::new();
    for scene in ["INT. A", "INT. B", "INT. C"] {
        tokens.push(Token::new(TokenKind::SceneHeading, scene));
        for _ in 0..2 {
            tokens.push(Token::new(TokenKind::Separator, ""));
            tokens.push(Token::new(TokenKind::Action, "aaaaaaaa bbbbbbbb cccccccc"));
        }
        tokens.push(Token::new(TokenKind::Separator, ""));
    }

    let out = process(&tokens, &config);

    let breaks: Vec<usize> = out
        .iter()
        .enumerate()
        .filter(|(_, l)| l.is_page_break())
        .map(|(i, _)| i)
        .collect();
    assert_eq!(breaks.len(), 2);

    for &at in &breaks {
        assert!(!out[at].scene_split);
        assert_ne!(out[at - 1].kind, TokenKind::SceneHeading);
        assert_eq!(out[at + 1].kind, TokenKind::SceneHeading);
    }
    assert!(page_spans(&out).iter().all(|p| p.len() <= 10));
}

#[test]
fn test_long_speech_split_with_markers() {
    let mut config = FormatConfig::us_letter();
    config.lines_per_page = 8;
    config.split_dialogue = true;
    config.set_width(TokenKind::Dialogue, 10);

    let speech = words("word", 12);
    let tokens = vec![
        Token::new(TokenKind::Character, "ALICE"),
        Token::new(TokenKind::Dialogue, speech.clone()),
    ];

    let out = process(&tokens, &config);

    assert_eq!(out[7].kind, TokenKind::More);
    assert_eq!(out[7].text, "(MORE)");
    assert!(out[8].is_page_break());
    assert!(out[8].scene_split);
    assert_eq!(out[9].text, "ALICE (CONT'D)");
    assert_eq!(out[9].kind, TokenKind::Character);

    let spoken: Vec<&str> = out
        .iter()
        .filter(|l| l.kind == TokenKind::Dialogue)
        .map(|l| l.text.as_str())
        .collect();
    assert_eq!(spoken.len(), 12);
    assert_eq!(spoken.join(" "), speech);
    assert_eq!(out.len(), 16);
}

#[test]
fn test_speech_moves_whole_without_splitting() {
    let mut config = FormatConfig::us_letter();
    config.lines_per_page = 8;
    config.set_width(TokenKind::Dialogue, 10);

    let tokens = vec![
        Token::new(TokenKind::Action, "Quiet."),
        Token::new(TokenKind::Separator, ""),
        Token::new(TokenKind::Character, "ALICE"),
        Token::new(TokenKind::Dialogue, words("word", 6)),
    ];

    let out = process(&tokens, &config);
    let breaks: Vec<usize> = out
        .iter()
        .enumerate()
        .filter(|(_, l)| l.is_page_break())
        .map(|(i, _)| i)
        .collect();

    // Nine rows; the speech cannot be cut so it starts the second page
    assert_eq!(breaks, vec![1]);
    assert_eq!(out[2].text, "ALICE");
    assert!(out.iter().all(|l| l.kind != TokenKind::More));
}

#[test]
fn test_dual_block_left_padded() {
    let mut config = FormatConfig::us_letter();
    config.set_width(TokenKind::Dialogue, 20);

    let tokens = vec![
        Token::new(TokenKind::Character, "BOB").with_position(DualPosition::Left),
        Token::new(TokenKind::Dialogue, "No.").with_position(DualPosition::Left),
        Token::new(TokenKind::Character, "CAROL").with_position(DualPosition::Right),
        Token::new(TokenKind::Dialogue, "aaaaaaaaaa bbbbbbbbbb cccccccccc")
            .with_position(DualPosition::Right),
    ];

    let out = process(&tokens, &config);

    assert_eq!(out.len(), 4);
    let column = out[0].right_column.as_ref().unwrap();
    assert_eq!(column.len(), 4);
    assert_eq!(texts(column), vec!["CAROL", "aaaaaaaaaa", "bbbbbbbbbb", "cccccccccc"]);
    assert!(out[2].is_blank() && out[2].is_synthetic());
    assert!(out[3].is_blank() && out[3].is_synthetic());
}

#[test]
fn test_dual_split_mirrors_right_column() {
    let mut config = FormatConfig::us_letter();
    config.lines_per_page = 4;
    config.split_dialogue = true;
    config.set_width(TokenKind::Dialogue, 20);

    let tokens = vec![
        Token::new(TokenKind::Character, "BOB").with_position(DualPosition::Left),
        Token::new(TokenKind::Dialogue, words("left", 6)).with_position(DualPosition::Left),
        Token::new(TokenKind::Character, "CAROL").with_position(DualPosition::Right),
        Token::new(TokenKind::Dialogue, words("rite", 6)).with_position(DualPosition::Right),
    ];

    let out = process(&tokens, &config);

    assert_eq!(
        texts(&out).join("|"),
        "BOB|left0000|left0001|(MORE)||BOB (CONT'D)|left0002|left0003|(MORE)||\
         BOB (CONT'D)|left0004|left0005"
    );

    let columns: Vec<Vec<&str>> = [0, 5, 10]
        .iter()
        .map(|&i| texts(out[i].right_column.as_ref().unwrap()))
        .collect();
    assert_eq!(columns[0], vec!["CAROL", "rite0000", "rite0001", "(MORE)"]);
    assert_eq!(columns[1], vec!["CAROL (CONT'D)", "rite0002", "rite0003", "(MORE)"]);
    assert_eq!(columns[2], vec!["CAROL (CONT'D)", "rite0004", "rite0005"]);

    let right_more = &out[0].right_column.as_ref().unwrap()[3];
    assert_eq!(right_more.position, Some(DualPosition::Right));
}

#[test]
fn test_explicit_page_break_and_hidden_tokens() {
    let tokens = tokens_from_json(
        r#"[
            {"type": "scene_heading", "text": "INT. HALL - DAY", "scene": "1"},
            {"type": "action", "text": "Doors slam."},
            {"type": "note", "text": "check continuity", "hide": true},
            {"type": "page_break"},
            {"type": "scene_heading", "text": "EXT. YARD - DAY", "scene": "2"},
            {"type": "action", "text": "Silence."}
        ]"#,
    )
    .unwrap();

    let mut paginator = Paginator::default();
    let lines = paginator.run(&tokens);

    assert_eq!(
        texts(lines),
        vec!["INT. HALL - DAY", "Doors slam.", "", "EXT. YARD - DAY", "Silence."]
    );
    assert!(lines[2].is_page_break());
    assert!(!lines[2].scene_split);
    assert_eq!(lines[3].scene.as_deref(), Some("2"));

    let indices: Vec<usize> = lines.iter().map(|l| l.global_index).collect();
    assert_eq!(indices, vec![0, 1, 2, 3, 4]);
    assert_eq!(paginator.page_count(), 2);
}

#[test]
fn test_trailing_page_break_adds_no_empty_page() {
    let tokens = vec![
        Token::new(TokenKind::Action, "Done."),
        Token::new(TokenKind::Separator, ""),
        Token::new(TokenKind::PageBreak, ""),
        Token::new(TokenKind::Separator, ""),
    ];

    let mut paginator = Paginator::default();
    let lines = paginator.run(&tokens);

    assert_eq!(texts(lines), vec!["Done.", ""]);
    assert!(lines.iter().all(|l| !l.is_page_break()));
    assert_eq!(paginator.page_count(), 1);
}

#[test]
fn test_custom_labels() {
    let config = FormatConfig::from_json(
        r#"{"lines_per_page": 4, "split_dialogue": true,
            "text_more": "(PLUS)", "text_contd": "(SUITE)",
            "widths": {"action": {"max": 58}, "character": {"max": 38}, "dialogue": {"max": 10}}}"#,
    )
    .unwrap();

    let tokens = vec![
        Token::new(TokenKind::Character, "ALICE"),
        Token::new(TokenKind::Dialogue, words("word", 5)),
    ];
    let out = process(&tokens, &config);

    assert_eq!(out[3].text, "(PLUS)");
    assert_eq!(out[5].text, "ALICE (SUITE)");
}

#[test]
fn test_empty_input() {
    assert!(process(&[], &FormatConfig::default()).is_empty());
}
