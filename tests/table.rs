use stay_recon::{
    report::{NamedTable, ReportCell},
    table::{render_named_table, render_table},
};

#[test]
fn render_table_aligns_columns() {
    let headers = vec!["guest".to_string(), "nights".to_string()];
    let rows = vec![
        vec!["ANN".to_string(), "2".to_string()],
        vec!["MARCO ROSSI".to_string(), "14".to_string()],
    ];

    let rendered = render_table(&headers, &rows);
    let lines: Vec<&str> = rendered.lines().collect();

    assert_eq!(
        lines,
        vec![
            "guest        nights",
            "-----------  ------",
            "ANN          2",
            "MARCO ROSSI  14"
        ]
    );
}

#[test]
fn render_table_normalizes_control_characters() {
    let headers = vec!["note".to_string()];
    let rows = vec![vec!["line1\nline2\tvalue".to_string()]];

    let rendered = render_table(&headers, &rows);
    let lines: Vec<&str> = rendered.lines().collect();

    assert_eq!(lines.len(), 3);
    assert_eq!(lines[2], "line1 line2 value");
}

#[test]
fn render_table_handles_unicode_and_ansi_widths() {
    let headers = vec!["résumé".to_string(), "status".to_string()];
    let rows = vec![vec!["café".to_string(), "\u{1b}[31mERR\u{1b}[0m".to_string()]];

    let rendered = render_table(&headers, &rows);
    let lines: Vec<&str> = rendered.lines().collect();

    assert_eq!(lines[0], "résumé  status");
    assert_eq!(lines[2], "café    \u{1b}[31mERR\u{1b}[0m");
}

#[test]
fn named_table_renders_integer_cells() {
    let table = NamedTable {
        name: "Full".into(),
        headers: vec!["Guest Name".into(), "Net Night Difference".into()],
        rows: vec![vec![
            ReportCell::Text("CY".into()),
            ReportCell::Integer(-2),
        ]],
    };

    let rendered = render_named_table(&table);
    assert!(rendered.starts_with("Full\n"));
    assert!(rendered.contains("CY          -2"));
    assert!(rendered.ends_with("1 guest(s)\n"));
}
