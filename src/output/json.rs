use serde_json::{Value, json};

use crate::cli::{SortOrder, View};
use crate::core::{HourlyHours, Ranked, Summary};

fn ordered_values<T>(items: &[T], order: SortOrder, to_value: impl Fn(&T) -> Value) -> Value {
    let values: Vec<Value> = match order {
        SortOrder::Asc => items.iter().map(&to_value).collect(),
        SortOrder::Desc => items.iter().rev().map(&to_value).collect(),
    };
    Value::Array(values)
}

fn ranked_values(label: &str, ranked: &[Ranked]) -> Value {
    Value::Array(
        ranked
            .iter()
            .map(|r| json!({ label: r.key, "hours": r.hours }))
            .collect(),
    )
}

fn hourly_value(h: &HourlyHours) -> Value {
    json!({ "hour": h.hour, "hours": h.hours })
}

/// Key of a view inside the combined summary object
fn view_key(view: View) -> &'static str {
    match view {
        View::Summary => "summary",
        View::Timeline => "timeline",
        View::Platforms => "platforms",
        View::Countries => "countries",
        View::Artists => "artists",
        View::Albums => "albums",
        View::Behavior => "behavior",
        View::Podcasts => "podcasts",
        View::Hourly => "hourly",
    }
}

fn view_value(view: View, summary: &Summary, files: &[String], order: SortOrder) -> Value {
    match view {
        View::Summary => {
            let mut object = serde_json::Map::new();
            object.insert("files".to_string(), json!(files));
            for tab in View::TABS {
                object.insert(
                    view_key(tab).to_string(),
                    view_value(tab, summary, files, order),
                );
            }
            Value::Object(object)
        }
        View::Timeline => ordered_values(&summary.monthly_hours, order, |m| {
            json!({ "month": m.key, "hours": m.hours })
        }),
        View::Platforms => Value::Array(
            summary
                .platform_counts
                .iter()
                .map(|p| json!({ "platform": p.platform.as_str(), "count": p.count }))
                .collect(),
        ),
        View::Countries => ranked_values("country", &summary.country_hours),
        View::Artists => ranked_values("artist", &summary.artist_hours),
        View::Albums => ranked_values("album", &summary.album_hours),
        View::Podcasts => ranked_values("show", &summary.top_podcasts),
        View::Behavior => {
            let b = &summary.behavior;
            json!({
                "skipped": b.skipped,
                "shuffled": b.shuffled,
                "offline": b.offline,
                "total": b.total,
                "skip_rate": b.rate(b.skipped),
                "shuffle_rate": b.rate(b.shuffled),
                "offline_rate": b.rate(b.offline),
            })
        }
        View::Hourly => ordered_values(&summary.hourly_hours, order, hourly_value),
    }
}

/// Pretty JSON for a view; `View::Summary` also lists the loaded files
pub(crate) fn render_view_json(
    view: View,
    summary: &Summary,
    files: &[String],
    order: SortOrder,
) -> String {
    let value = view_value(view, summary, files, order);
    serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string())
}
