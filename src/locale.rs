use crate::config::FirstDayOfWeek;
use chrono::{Datelike, NaiveDate};

/// One language's display strings.
#[derive(Debug)]
pub struct Locale {
    pub code: &'static str,
    pub view_title: &'static str,
    pub activity_graph_title: &'static str,
    pub tasks_graph_title: &'static str,
    pub legend_less: &'static str,
    pub legend_more: &'static str,
    pub tooltip_activities: &'static str,
    pub months_full: [&'static str; 12],
    pub months_short: [&'static str; 12],
    /// Sunday first.
    pub days_short: [&'static str; 7],
    /// Sunday first.
    pub days_full: [&'static str; 7],
    pub nav_prev_month: &'static str,
    pub nav_next_month: &'static str,
}

pub static EN: Locale = Locale {
    code: "en",
    view_title: "Activity Graph",
    activity_graph_title: "Your Activity Graph",
    tasks_graph_title: "Completed Tasks Graph",
    legend_less: "Less",
    legend_more: "More",
    tooltip_activities: "activities on",
    months_full: [
        "January",
        "February",
        "March",
        "April",
        "May",
        "June",
        "July",
        "August",
        "September",
        "October",
        "November",
        "December",
    ],
    months_short: [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ],
    days_short: ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"],
    days_full: [
        "Sunday",
        "Monday",
        "Tuesday",
        "Wednesday",
        "Thursday",
        "Friday",
        "Saturday",
    ],
    nav_prev_month: "Previous month",
    nav_next_month: "Next month",
};

pub static RU: Locale = Locale {
    code: "ru",
    view_title: "График активности",
    activity_graph_title: "Ваш график активности",
    tasks_graph_title: "График выполненных задач",
    legend_less: "Меньше",
    legend_more: "Больше",
    tooltip_activities: "активностей",
    months_full: [
        "Январь",
        "Февраль",
        "Март",
        "Апрель",
        "Май",
        "Июнь",
        "Июль",
        "Август",
        "Сентябрь",
        "Октябрь",
        "Ноябрь",
        "Декабрь",
    ],
    months_short: [
        "Янв", "Фев", "Мар", "Апр", "Май", "Июн", "Июл", "Авг", "Сен", "Окт", "Ноя", "Дек",
    ],
    days_short: ["Вс", "Пн", "Вт", "Ср", "Чт", "Пт", "Сб"],
    days_full: [
        "Воскресенье",
        "Понедельник",
        "Вторник",
        "Среда",
        "Четверг",
        "Пятница",
        "Суббота",
    ],
    nav_prev_month: "Предыдущий месяц",
    nav_next_month: "Следующий месяц",
};

static AVAILABLE: [&Locale; 2] = [&EN, &RU];

/// Resolves a language tag such as `ru-RU`; unknown languages get English.
pub fn resolve(tag: &str) -> &'static Locale {
    let base = tag
        .split(['-', '_'])
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();
    AVAILABLE
        .iter()
        .copied()
        .find(|locale| locale.code == base)
        .unwrap_or(&EN)
}

impl Locale {
    /// `month` is 1-based.
    pub fn month_full(&self, month: u32) -> &'static str {
        self.months_full[(month.clamp(1, 12) - 1) as usize]
    }

    pub fn month_short(&self, month: u32) -> &'static str {
        self.months_short[(month.clamp(1, 12) - 1) as usize]
    }

    pub fn month_title(&self, month_start: NaiveDate) -> String {
        format!(
            "{} {}",
            self.month_full(month_start.month()),
            month_start.year()
        )
    }

    /// Short day names starting from `first_day`.
    pub fn days_short_from(&self, first_day: FirstDayOfWeek) -> Vec<&'static str> {
        let offset = first_day.number() as usize;
        (0..7).map(|i| self.days_short[(offset + i) % 7]).collect()
    }

    pub fn tooltip(&self, date: &str, count: u32) -> String {
        format!("{} {} {}", count, self.tooltip_activities, date)
    }
}
