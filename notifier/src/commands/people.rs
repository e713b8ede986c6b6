use anyhow::anyhow;
use birthdays::{
    calculate_age_with_policy, days_until_birthday_with_policy, format_birthday,
    format_long_date, names, MemberId, MemberRecord, Roster,
};
use chrono::NaiveDate;

use crate::state::{AppState, MemberDetail, MemberRow, MembersView, TodayView, UpcomingView};

fn build_member_row(roster: &Roster, member: &MemberRecord, today: NaiveDate) -> MemberRow {
    MemberRow {
        id: member.id.to_string(),
        full_name: member.full_name.clone(),
        initials: names::initials(&member.full_name),
        phone: member.phone.clone(),
        email: member.email.clone(),
        age: calculate_age_with_policy(member.date_of_birth, today, roster.leap_day_policy),
        birthday: format_birthday(member.date_of_birth),
    }
}

fn build_member_detail(roster: &Roster, member: &MemberRecord, today: NaiveDate) -> MemberDetail {
    let policy = roster.leap_day_policy;

    MemberDetail {
        id: member.id.to_string(),
        full_name: member.full_name.clone(),
        initials: names::initials(&member.full_name),
        gender: member.gender.clone(),
        age: calculate_age_with_policy(member.date_of_birth, today, policy),
        date_of_birth: format_long_date(member.date_of_birth),
        birthday: format_birthday(member.date_of_birth),
        days_until_birthday: days_until_birthday_with_policy(member.date_of_birth, today, policy),
        phone: member.phone.clone(),
        email: member.email.clone(),
        address: member.address.clone(),
        profile_picture_url: member.profile_picture_url.clone(),
    }
}

/// The directory in name order, optionally filtered on name, phone or email.
pub fn members(
    state: &AppState,
    today: NaiveDate,
    search: Option<&str>,
) -> anyhow::Result<MembersView> {
    let roster = state.load_roster()?;
    let search = search.map(str::trim).filter(|term| !term.is_empty());

    let members = roster
        .search(search.unwrap_or_default())
        .into_iter()
        .map(|member| build_member_row(&roster, member, today))
        .collect();

    Ok(MembersView {
        search: search.map(str::to_string),
        members,
    })
}

pub fn today(state: &AppState, today: NaiveDate) -> anyhow::Result<TodayView> {
    let roster = state.load_roster()?;

    Ok(TodayView {
        date: today,
        birthdays: roster.todays_birthdays(today),
    })
}

pub fn upcoming(state: &AppState, today: NaiveDate, days: Option<u32>) -> anyhow::Result<UpcomingView> {
    let roster = state.load_roster()?;
    let window_days = days.unwrap_or(state.config.upcoming_days);

    Ok(UpcomingView {
        date: today,
        window_days,
        birthdays: roster.report(today, window_days).upcoming,
    })
}

pub fn member(state: &AppState, today: NaiveDate, member_id: &str) -> anyhow::Result<MemberDetail> {
    let roster = state.load_roster()?;
    let id = MemberId::from(member_id);

    roster
        .find(&id)
        .map(|member| build_member_detail(&roster, member, today))
        .ok_or_else(|| anyhow!("no member with id {member_id}"))
}
