//! Post rendering.
//!
//! Pure functions turning a `Draft` into the plain-text post shown on the
//! preview step, forwarded to moderators, and published to the channel.
//! Rendering never fails: missing fields produce placeholders.

use catchpost_types::catalog::{fish_name, fishing_option, location_name, point_type_name, water_temp_name};
use catchpost_types::draft::{Draft, FishChoice};

/// Stored temperature values that mean "not provided".
const EMPTY_TEMPS: &[&str] = &["", "none", "null", "nan", "absent", "skip"];

const UNKNOWN_AUTHOR: &str = "неизвестен";

/// Render a draft as the post body.
pub fn render(draft: &Draft) -> String {
    let location = draft
        .location
        .as_deref()
        .map(|code| hashtag(location_name(code).unwrap_or(code)))
        .unwrap_or_else(|| "—".to_string());

    let points = if draft.point_types.is_empty() {
        "—".to_string()
    } else {
        draft
            .point_types
            .iter()
            .map(|code| point_type_name(code).unwrap_or(code))
            .collect::<Vec<_>>()
            .join(", ")
    };

    let fish = match &draft.fish_type {
        Some(FishChoice::Preset(code)) => fish_name(code).unwrap_or(code).to_string(),
        Some(FishChoice::Custom(text)) => text.clone(),
        None => String::new(),
    };

    let fishing = fishing_line(draft);

    let mut lines = vec![
        format!("📍 Водоём: {location}"),
        format!("🎯 Точка: {points}"),
        format!("🐟 Рыба: {fish}"),
        format!("🎣 Ловля: {fishing}"),
        format!("🗺 Координаты: {}", draft.coords.as_deref().unwrap_or("")),
    ];

    if let Some(temp) = draft.water_temp.as_deref().filter(|t| !is_empty_temp(t)) {
        lines.push(format!("🌡 Температура: {}", water_temp_name(temp).unwrap_or(temp)));
    }

    if let Some(comment) = draft
        .comment
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
    {
        lines.push(format!("📝 Комментарий: {comment}"));
    }

    lines.push(format!("👤 Автор: {}", author_label(draft)));

    lines.join("\n")
}

/// Render the post as published to the channel: the body followed by the
/// call-to-action line. A blank call-to-action is omitted.
pub fn render_publication(draft: &Draft, call_to_action: &str) -> String {
    let body = render(draft);
    let cta = call_to_action.trim();
    if cta.is_empty() {
        body
    } else {
        format!("{body}\n\n{cta}")
    }
}

/// The author's nick, or the "unknown" label when none was given.
pub fn author_label(draft: &Draft) -> &str {
    draft
        .author
        .as_deref()
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .unwrap_or(UNKNOWN_AUTHOR)
}

/// Turn a display name into a hashtag: lowercase, dots dropped, `ё`
/// folded to `е`, whitespace runs joined with underscores.
pub fn hashtag(name: &str) -> String {
    let normalized: String = name
        .to_lowercase()
        .chars()
        .filter(|c| *c != '.')
        .map(|c| if c == 'ё' { 'е' } else { c })
        .collect();
    format!("#{}", normalized.split_whitespace().collect::<Vec<_>>().join("_"))
}

fn fishing_line(draft: &Draft) -> String {
    let Some(code) = draft.fishing_type.as_deref() else {
        return String::new();
    };
    let label = fishing_option(code).map(|o| o.post_label).unwrap_or(code);
    match draft.fishing_extra.as_deref().map(str::trim) {
        Some(extra) if !extra.is_empty() => format!("{label} {extra}"),
        _ => label.to_string(),
    }
}

fn is_empty_temp(value: &str) -> bool {
    let value = value.trim().to_lowercase();
    EMPTY_TEMPS.contains(&value.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use catchpost_types::ids::MediaRef;

    fn full_draft() -> Draft {
        Draft {
            location: Some("ladoga".to_string()),
            point_types: vec!["trophy".to_string(), "farm".to_string()],
            fish_type: Some(FishChoice::Preset("mix".to_string())),
            fishing_type: Some("donka".to_string()),
            fishing_extra: Some("19м".to_string()),
            coords: Some("56:123".to_string()),
            water_temp: Some("high".to_string()),
            photos: vec![MediaRef::new("p1")],
            comment: Some("Клюёт утром".to_string()),
            author: Some("Rybak".to_string()),
        }
    }

    #[test]
    fn test_hashtag_normalization() {
        assert_eq!(hashtag("оз. Старый Острог"), "#оз_старый_острог");
        assert_eq!(hashtag("Ладожский  архипелаг"), "#ладожский_архипелаг");
        assert_eq!(hashtag("  Озёрное "), "#озерное");
    }

    #[test]
    fn test_render_full_draft() {
        let text = render(&full_draft());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "📍 Водоём: #ладожское_озеро");
        assert!(lines[1].starts_with("🎯 Точка: "));
        assert!(lines[1].contains(", "));
        assert_eq!(lines[2], "🐟 Рыба: Разнорыбица");
        assert!(lines[3].starts_with("🎣 Ловля: "));
        assert!(lines[3].ends_with(" 19м"));
        assert_eq!(lines[4], "🗺 Координаты: 56:123");
        assert!(lines[5].starts_with("🌡 Температура: "));
        assert_eq!(lines[6], "📝 Комментарий: Клюёт утром");
        assert_eq!(lines[7], "👤 Автор: Rybak");
    }

    #[test]
    fn test_render_preserves_point_type_order() {
        let mut draft = full_draft();
        draft.point_types = vec!["quest".to_string(), "farm".to_string()];
        let first = render(&draft);
        draft.point_types.reverse();
        let second = render(&draft);
        assert_ne!(first, second);
    }

    #[test]
    fn test_render_omits_empty_temperature_and_comment() {
        for sentinel in ["", "none", "NULL", "nan", "absent", "skip"] {
            let mut draft = full_draft();
            draft.water_temp = Some(sentinel.to_string());
            draft.comment = Some("   ".to_string());
            let text = render(&draft);
            assert!(!text.contains("🌡"), "sentinel {sentinel:?} leaked");
            assert!(!text.contains("📝"));
        }
    }

    #[test]
    fn test_render_custom_fish_and_missing_author() {
        let mut draft = full_draft();
        draft.fish_type = Some(FishChoice::Custom("Налим".to_string()));
        draft.author = None;
        let text = render(&draft);
        assert!(text.contains("🐟 Рыба: Налим"));
        assert!(text.ends_with("👤 Автор: неизвестен"));
    }

    #[test]
    fn test_render_empty_draft_does_not_panic() {
        let text = render(&Draft::default());
        assert!(text.contains("🎯 Точка: —"));
        assert!(text.contains("👤 Автор: неизвестен"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let draft = full_draft();
        assert_eq!(render(&draft), render(&draft));
    }

    #[test]
    fn test_publication_appends_call_to_action() {
        let draft = full_draft();
        let text = render_publication(&draft, "📨 ПРЕДЛОЖИТЬ ПОСТ");
        assert_eq!(text, format!("{}\n\n📨 ПРЕДЛОЖИТЬ ПОСТ", render(&draft)));
        assert_eq!(render_publication(&draft, "  "), render(&draft));
    }
}
