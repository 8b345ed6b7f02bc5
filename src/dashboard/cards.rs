//! Card components for the projection and the balance figures.

use maud::{Markup, html};

use crate::{
    endpoints,
    html::{
        BUTTON_SMALL_STYLE, CARD_STYLE, FORM_INLINE_INPUT_STYLE, LINK_STYLE, format_currency,
        format_currency_whole,
    },
    settings::Settings,
};

const AMOUNT_GREEN_STYLE: &str = "text-green-600 dark:text-green-400";
const AMOUNT_RED_STYLE: &str = "text-red-600 dark:text-red-400";

/// Gets the CSS class for coloring amounts (green for positive, red for negative).
fn amount_color_class(amount: i64) -> &'static str {
    if amount >= 0 {
        AMOUNT_GREEN_STYLE
    } else {
        AMOUNT_RED_STYLE
    }
}

/// The money left to spend and how it spreads over the days until the 25th.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct ProjectionSummary {
    pub remaining: i64,
    pub days_until_cutoff: i64,
    pub per_day: i64,
}

pub(super) fn projection_card(summary: &ProjectionSummary) -> Markup {
    let color = amount_color_class(summary.remaining);

    html!(
        section class=(CARD_STYLE) data-projection="true"
        {
            div class="grid grid-cols-3 gap-4 text-center"
            {
                div
                {
                    div class="text-xs uppercase text-gray-500 dark:text-gray-400" { "Remaining" }
                    div class={"text-2xl font-bold tabular-nums " (color)} data-remaining="true"
                    { (format_currency_whole(summary.remaining)) }
                }

                div
                {
                    div class="text-xs uppercase text-gray-500 dark:text-gray-400" { "Days to the 25th" }
                    div class="text-2xl font-bold tabular-nums" data-days="true"
                    { (summary.days_until_cutoff) }
                }

                div
                {
                    div class="text-xs uppercase text-gray-500 dark:text-gray-400" { "Per day" }
                    div class={"text-2xl font-bold tabular-nums " (amount_color_class(summary.per_day))}
                        data-per-day="true"
                    { (format_currency_whole(summary.per_day)) }
                }
            }
        }
    )
}

/// The balance figures with a form for updating them.
pub(super) fn balance_card(settings: &Settings) -> Markup {
    let input = |name: &str, label: &str, value: f64| {
        html!(
            div class="flex items-center justify-between gap-3"
            {
                label for=(name) class="text-sm font-medium text-gray-900 dark:text-white"
                { (label) }

                div class="input-wrapper"
                {
                    input
                        id=(name)
                        type="number"
                        step="0.01"
                        name=(name)
                        placeholder=(value)
                        class=(FORM_INLINE_INPUT_STYLE);
                }
            }
        )
    };

    html!(
        section class=(CARD_STYLE)
        {
            form
                hx-post=(endpoints::BALANCE_API)
                hx-target-error="#alert-container"
                class="space-y-2"
            {
                h2 class="text-sm font-semibold" { "Balance" }

                dl class="grid grid-cols-2 gap-x-4 gap-y-1 text-sm"
                {
                    dt { "Balance" }
                    dd class="text-right tabular-nums" data-balance="true" { (format_currency(settings.balance)) }
                    dt { "Future" }
                    dd class="text-right tabular-nums" { (format_currency(settings.future)) }
                    dt { "Savings in checking" }
                    dd class="text-right tabular-nums" { (format_currency(settings.savings_ignore)) }
                    dt class="text-gray-500 dark:text-gray-400" { "Savings at last reset" }
                    dd class="text-right tabular-nums text-gray-500 dark:text-gray-400"
                    { (format_currency(settings.savings_ignore_at_reset)) }
                    dt
                    {
                        "Girls' allowances ("
                        a href=(endpoints::SAVINGS_VIEW) class=(LINK_STYLE) { "edit" }
                        ")"
                    }
                    dd class="text-right tabular-nums" { (format_currency(settings.girls_total())) }
                }

                p class="text-xs text-gray-500 dark:text-gray-400"
                { "Leave a field blank to keep its current value." }

                (input("balance", "New balance", settings.balance))
                (input("future", "New future", settings.future))
                (input("savings_ignore", "New savings in checking", settings.savings_ignore))

                div class="flex justify-end"
                {
                    button type="submit" class=(BUTTON_SMALL_STYLE) { "Update" }
                }
            }
        }
    )
}

/// Reminds the user to start a new month once the 25th is close.
pub(super) fn reset_due_banner() -> Markup {
    html!(
        div
            role="status"
            data-reset-due="true"
            class="w-full p-4 text-sm text-yellow-800 rounded-lg bg-yellow-50
                dark:bg-gray-800 dark:text-yellow-300"
        {
            "The 25th is coming up. "
            a href=(endpoints::MONTH_RESET_VIEW) class=(LINK_STYLE) { "Start a new month" }
            " once the salary has arrived."
        }
    )
}
