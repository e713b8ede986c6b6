//! Birthday digest email
//!
//! Turns a `BirthdayReport` into a subject line and HTML/plain-text bodies.
//! Nothing is rendered for an empty report: the caller skips sending.

use std::fmt::Write;

use birthdays::{format_birthday, names, BirthdayProjection, BirthdayReport, UpcomingBirthday};

/// Rendered notification, ready for a `Mailer`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Digest {
    pub subject: String,
    pub html: String,
    pub text: String,
}

/// Subject by fixed priority: today's birthdays win over upcoming ones.
pub fn subject_line(today_count: usize, upcoming_count: usize) -> String {
    if today_count > 0 {
        format!(
            "🎉 {} Birthday{} Today!",
            today_count,
            plural(today_count)
        )
    } else if upcoming_count > 0 {
        format!(
            "📅 {} Upcoming Birthday{}",
            upcoming_count,
            plural(upcoming_count)
        )
    } else {
        "🎂 Birthday Reminders".to_string()
    }
}

/// "1 day" / "3 days".
pub fn days_label(days: u32) -> String {
    if days == 1 {
        "1 day".to_string()
    } else {
        format!("{days} days")
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

pub fn render(report: &BirthdayReport, organization: &str) -> Option<Digest> {
    if report.is_empty() {
        return None;
    }

    Some(Digest {
        subject: subject_line(report.today.len(), report.upcoming.len()),
        html: render_html(report, organization),
        text: render_text(report, organization),
    })
}

// ============================================================================
// HTML body
// ============================================================================

fn render_html(report: &BirthdayReport, organization: &str) -> String {
    let mut html = String::new();
    let heading_date = report.date.format("%A, %B %-d, %Y");

    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<title>Birthday Reminders</title>\n</head>\n");
    html.push_str(
        "<body style=\"margin: 0; padding: 0; font-family: Arial, sans-serif; background-color: #f3f4f6;\">\n",
    );
    html.push_str("<div style=\"max-width: 600px; margin: 0 auto; padding: 20px;\">\n");
    let _ = writeln!(
        html,
        "<h1 style=\"color: #1e3a8a;\">🎂 Birthday Reminders</h1>\n<p style=\"color: #6b7280;\">{heading_date}</p>"
    );

    if !report.today.is_empty() {
        html.push_str("<h2 style=\"color: #78350f;\">🎉 Celebrating Today!</h2>\n");
        for member in &report.today {
            html.push_str("<div style=\"border-left: 4px solid #d97706; padding: 12px; margin-bottom: 12px; background: #ffffff;\">\n");
            let _ = writeln!(
                html,
                "<p style=\"margin: 0; font-weight: bold;\">{}</p>\n<p style=\"margin: 4px 0 0 0;\">🎂 Turns {}! | 📅 {}</p>",
                escape_html(&member.full_name),
                member.age,
                format_birthday(member.date_of_birth),
            );
            push_contact_html(&mut html, member);
            html.push_str("</div>\n");
        }
    }

    if !report.upcoming.is_empty() {
        let _ = writeln!(
            html,
            "<h2 style=\"color: #1e3a8a;\">📅 Coming Up (Next {} Days)</h2>",
            report.window_days
        );
        for UpcomingBirthday { member, days_until } in &report.upcoming {
            html.push_str("<div style=\"border-left: 4px solid #1e3a8a; padding: 12px; margin-bottom: 12px; background: #ffffff;\">\n");
            let _ = writeln!(
                html,
                "<p style=\"margin: 0; font-weight: bold;\">{}</p>\n<p style=\"margin: 4px 0 0 0;\">📅 {} | {}</p>",
                escape_html(&member.full_name),
                format_birthday(member.date_of_birth),
                days_label(*days_until),
            );
            push_contact_html(&mut html, member);
            html.push_str("</div>\n");
        }
    }

    let _ = writeln!(
        html,
        "<p style=\"margin-top: 30px; color: #9ca3af; font-size: 12px; text-align: center;\">{} - Church Member Directory<br>This is an automated reminder. Please reach out to celebrate with your members!</p>",
        escape_html(organization)
    );
    html.push_str("</div>\n</body>\n</html>\n");
    html
}

fn push_contact_html(html: &mut String, member: &BirthdayProjection) {
    let _ = write!(
        html,
        "<p style=\"margin: 4px 0 0 0; color: #6b7280;\">📞 {}",
        escape_html(&member.phone)
    );
    if let Some(email) = &member.email {
        let _ = write!(html, "<br>📧 {}", escape_html(email));
    }
    html.push_str("</p>\n");
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

// ============================================================================
// Plain-text body
// ============================================================================

fn render_text(report: &BirthdayReport, organization: &str) -> String {
    let mut text = String::new();
    let _ = writeln!(text, "Birthday Reminders - {}", report.date.format("%A, %B %-d, %Y"));

    if !report.today.is_empty() {
        text.push_str("\nCelebrating today:\n");
        for member in &report.today {
            let _ = writeln!(
                text,
                "  - {} turns {} ({})",
                member.full_name,
                member.age,
                contact_line(member)
            );
        }
    }

    if !report.upcoming.is_empty() {
        let _ = writeln!(text, "\nComing up in the next {} days:", report.window_days);
        for UpcomingBirthday { member, days_until } in &report.upcoming {
            let _ = writeln!(
                text,
                "  - {}: {} in {} ({})",
                format_birthday(member.date_of_birth),
                member.full_name,
                days_label(*days_until),
                contact_line(member)
            );
        }
    }

    if let Some(first) = report.today.first() {
        let _ = writeln!(
            text,
            "\nDon't forget to wish {} a happy birthday!",
            names::first_name(&first.full_name)
        );
    }

    let _ = writeln!(text, "\n{organization} - Church Member Directory");
    text
}

fn contact_line(member: &BirthdayProjection) -> String {
    match &member.email {
        Some(email) => format!("{}, {}", member.phone, email),
        None => member.phone.clone(),
    }
}
