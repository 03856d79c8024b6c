use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::Activity;

/// Activities sharing the same UTC calendar date.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DateGroup {
    pub date: NaiveDate,
    pub activities: Vec<Activity>,
}

/// Groups activities by the UTC date of their timestamp. Groups come out in
/// ascending date order and each group is sorted by timestamp, ties broken by id.
pub fn group_by_date<'a>(activities: impl IntoIterator<Item = &'a Activity>) -> Vec<DateGroup> {
    let mut sorted: Vec<&Activity> = activities.into_iter().collect();
    sorted.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));

    let mut groups: BTreeMap<NaiveDate, Vec<Activity>> = BTreeMap::new();
    for activity in sorted {
        groups
            .entry(activity.date.date_naive())
            .or_default()
            .push(activity.clone());
    }
    groups
        .into_iter()
        .map(|(date, activities)| DateGroup { date, activities })
        .collect()
}
