use std::collections::BTreeMap;

use chrono::{TimeZone, Utc};
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use timewheel_engine::{
    apply_template, parse_iso_date, preview_template_application, ApplyPolicy, SequentialIds,
    TargetRange, TaskForm, Template, TemplateApplyOptions, TemplateTask, WeekdayId,
};

fn week_template() -> Template {
    let slots = [
        ("Breakfast", "08:00", "08:30"),
        ("Work", "09:00", "13:00"),
        ("Lunch", "13:00", "14:00"),
        ("Project", "14:00", "18:00"),
        ("Training", "19:00", "20:00"),
    ];
    let tasks: Vec<TemplateTask> = slots
        .iter()
        .map(|(title, start, end)| TaskForm::new(title, start, end).into())
        .collect();
    let days: BTreeMap<WeekdayId, Vec<TemplateTask>> =
        WeekdayId::ALL.iter().map(|w| (*w, tasks.clone())).collect();
    let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    Template::new_week("bench", "Bench week", now, days)
}

fn bench_apply(c: &mut Criterion) {
    let template = week_template();
    let anchor = parse_iso_date("2025-03-15").unwrap();
    let dates = TargetRange::CurrentMonth.dates(anchor);
    let seeded = apply_template(
        &[],
        &template,
        &TemplateApplyOptions::new(ApplyPolicy::Replace, &dates),
        &mut SequentialIds::new("seed"),
    )
    .days;
    let merge = TemplateApplyOptions::new(ApplyPolicy::MergeSkipConflicts, &dates);

    c.bench_function("preview_merge_month", |b| {
        b.iter(|| preview_template_application(black_box(&seeded), &template, &merge))
    });
    c.bench_function("apply_merge_month", |b| {
        b.iter(|| {
            apply_template(
                black_box(&seeded),
                &template,
                &merge,
                &mut SequentialIds::new("t"),
            )
        })
    });
}

criterion_group!(benches, bench_apply);
criterion_main!(benches);
