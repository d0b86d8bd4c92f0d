//! Property tests for time arithmetic, overlap, trimming, and template apply.

use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use timewheel_engine::{
    add_task, apply_template, do_time_ranges_overlap, duration_minutes, find_overlapping_pairs,
    get_time_segments, minutes_to_time, preview_template_application, ApplyPolicy, Day,
    EditOptions, SequentialIds, TaskForm, Template, TemplateApplyOptions, TemplateTask,
};

fn clock() -> impl Strategy<Value = String> {
    (0i64..1440).prop_map(minutes_to_time)
}

fn range() -> impl Strategy<Value = (String, String)> {
    (clock(), clock()).prop_filter("zero-length", |(s, e)| s != e)
}

fn policy() -> impl Strategy<Value = ApplyPolicy> {
    prop_oneof![
        Just(ApplyPolicy::EmptyOnly),
        Just(ApplyPolicy::Replace),
        Just(ApplyPolicy::MergeSkipConflicts),
    ]
}

/// A day built through `add_task`, so its tasks never overlap.
fn day_from(date: &str, ranges: &[(String, String)]) -> Day {
    let mut ids = SequentialIds::new(date);
    ranges.iter().fold(Day::empty(date), |day, (s, e)| {
        add_task(&day, TaskForm::new("x", s, e), EditOptions::allow_overlap(), &mut ids).unwrap()
    })
}

proptest! {
    #[test]
    fn segments_sum_to_forward_distance(start in 0u32..1440, end in 0u32..1440) {
        prop_assume!(start != end);
        let s = minutes_to_time(start as i64);
        let e = minutes_to_time(end as i64);
        let total: u32 = get_time_segments(&s, &e).unwrap().iter().map(|(a, b)| b - a).sum();
        prop_assert_eq!(total, (end + 1440 - start) % 1440);
        prop_assert_eq!(duration_minutes(&s, &e).unwrap(), total);
    }

    #[test]
    fn segments_stay_within_one_day((s, e) in range()) {
        for (a, b) in get_time_segments(&s, &e).unwrap() {
            prop_assert!(a < b);
            prop_assert!(b <= 1440);
        }
    }

    #[test]
    fn overlap_is_symmetric(a in clock(), b in clock(), c in clock(), d in clock()) {
        prop_assert_eq!(
            do_time_ranges_overlap(&a, &b, &c, &d).unwrap(),
            do_time_ranges_overlap(&c, &d, &a, &b).unwrap()
        );
    }

    #[test]
    fn minutes_to_time_wraps_by_whole_days(m in -100_000i64..100_000) {
        prop_assert_eq!(minutes_to_time(m), minutes_to_time(m + 1440));
    }

    #[test]
    fn add_with_trim_leaves_no_overlaps(ranges in prop::collection::vec(range(), 1..12)) {
        let mut ids = SequentialIds::new("t");
        let mut day = Day::empty("2025-03-15");
        for (s, e) in &ranges {
            day = add_task(&day, TaskForm::new("x", s, e), EditOptions::allow_overlap(), &mut ids)
                .unwrap();
            prop_assert!(find_overlapping_pairs(&day.tasks).is_empty(), "{:?}", day.tasks);
            let last = day.tasks.last().unwrap();
            prop_assert_eq!(&last.start_time, s);
            prop_assert_eq!(&last.end_time, e);
        }
    }

    #[test]
    fn apply_reports_what_preview_predicts(
        first in prop::collection::vec(range(), 0..4),
        second in prop::collection::vec(range(), 0..4),
        source in prop::collection::vec(range(), 0..5),
        policy in policy(),
        offsets in prop::collection::vec(0u32..5, 0..6),
    ) {
        let days = vec![day_from("2025-03-10", &first), day_from("2025-03-12", &second)];
        let tasks: Vec<TemplateTask> = source
            .iter()
            .map(|(s, e)| TaskForm::new("tpl", s, e).into())
            .collect();
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let template = Template::new_day("tpl", "Template", now, tasks);
        let targets: Vec<String> = offsets.iter().map(|o| format!("2025-03-{:02}", 10 + o)).collect();
        let options = TemplateApplyOptions::new(policy, &targets);

        let preview = preview_template_application(&days, &template, &options);
        let applied = apply_template(&days, &template, &options, &mut SequentialIds::new("new"));
        prop_assert_eq!(&applied.preview, &preview);

        let added: usize = applied
            .days
            .iter()
            .flat_map(|d| d.tasks.iter())
            .filter(|t| t.id.starts_with("new-"))
            .count();
        prop_assert_eq!(added, preview.added_tasks);
        prop_assert_eq!(
            preview.affected_dates.len() + preview.untouched_days,
            preview.target_dates_count
        );
    }

    #[test]
    fn merge_never_introduces_overlaps(
        existing in prop::collection::vec(range(), 0..5),
        source in prop::collection::vec(range(), 0..6),
    ) {
        let days = vec![day_from("2025-03-10", &existing)];
        let tasks: Vec<TemplateTask> = source
            .iter()
            .map(|(s, e)| TaskForm::new("tpl", s, e).into())
            .collect();
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let template = Template::new_day("tpl", "Template", now, tasks);
        let options = TemplateApplyOptions::new(ApplyPolicy::MergeSkipConflicts, &["2025-03-10"]);
        let applied = apply_template(&days, &template, &options, &mut SequentialIds::new("new"));
        for day in &applied.days {
            prop_assert!(find_overlapping_pairs(&day.tasks).is_empty());
        }
    }
}
