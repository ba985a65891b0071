use criterion::{Criterion, criterion_group, criterion_main};
use stay_recon::{
    config::{ColumnMapping, ColumnSelector},
    data::{Table, Value},
    reconcile::reconcile_tables,
    report::Report,
};

const GUESTS: usize = 2_000;

fn guest_name(idx: usize) -> String {
    let name = format!("Guest {idx:05}");
    match idx % 3 {
        0 => name.to_lowercase(),
        1 => format!("  {name} "),
        _ => name.to_uppercase(),
    }
}

fn system_table() -> Table {
    let mut table = Table::new(vec!["Night".to_string(), "Guest".to_string()]);
    for idx in 0..GUESTS {
        for night in 0..(idx % 4 + 1) {
            table.push_row(vec![
                Some(Value::Integer(night as i64)),
                Some(Value::String(guest_name(idx))),
            ]);
        }
    }
    table
}

fn booking_table() -> Table {
    let mut table = Table::new(vec![
        "Guest".to_string(),
        "Arrival".to_string(),
        "Nights".to_string(),
    ]);
    for idx in (0..GUESTS).step_by(2).chain(GUESTS..GUESTS + 200) {
        let day = idx % 28 + 1;
        let nights = if idx % 17 == 0 {
            "n/a".to_string()
        } else {
            (idx % 5).to_string()
        };
        table.push_row(vec![
            Some(Value::String(guest_name(idx))),
            Some(Value::String(format!("2024-03-{day:02}"))),
            Some(Value::String(nights)),
        ]);
    }
    table
}

fn mapping() -> ColumnMapping {
    ColumnMapping {
        system_guest: ColumnSelector::Name("Guest".into()),
        booking_guest: ColumnSelector::Name("Guest".into()),
        booking_date: ColumnSelector::Name("Arrival".into()),
        booking_nights: ColumnSelector::Index(2),
    }
}

fn bench_reconcile(c: &mut Criterion) {
    let system = system_table();
    let booking = booking_table();
    let mapping = mapping();

    let mut group = c.benchmark_group("reconcile");
    group.sample_size(30);

    group.bench_function("reconcile_tables", |b| {
        b.iter(|| reconcile_tables(&system, &booking, &mapping).expect("reconcile"))
    });

    let report: Report = reconcile_tables(&system, &booking, &mapping)
        .expect("reconcile")
        .report;
    group.bench_function("report_views", |b| {
        b.iter(|| {
            (
                report.mismatches().len(),
                report.overlaps().len(),
                report.summary(),
            )
        })
    });

    group.finish();
}

criterion_group!(benches, bench_reconcile);
criterion_main!(benches);
