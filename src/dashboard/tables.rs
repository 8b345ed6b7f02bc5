//! The income and expense tables of the current month's ledger.

use maud::{Markup, html};

use crate::{
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_SECONDARY_STYLE, BUTTON_SMALL_STYLE, FORM_INLINE_INPUT_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, amount_input_value, format_currency,
    },
    ledger::LedgerItem,
    projection::open_total,
};

const CLEARED_ROW_STYLE: &str = "bg-gray-50 border-b text-gray-400 line-through \
    dark:bg-gray-900 dark:border-gray-700 dark:text-gray-500";

/// Renders a ledger table with a footer holding the total still to come.
///
/// `kind` is "income" or "expenses" and names the table for tests and styling.
pub(super) fn ledger_table(title: &str, kind: &str, items: &[LedgerItem]) -> Markup {
    html!(
        section class="w-full space-y-2"
        {
            h2 class="text-lg font-semibold" { (title) }

            div class="overflow-x-auto"
            {
                table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                    data-ledger=(kind)
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Item" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Day" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Amount" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Status" }
                        }
                    }

                    tbody
                    {
                        @for item in items {
                            (ledger_row(item))
                        }

                        @if items.is_empty() {
                            tr
                            {
                                td colspan="4" class="px-6 py-4 text-center"
                                {
                                    "Nothing here yet. Start a new month to fill the ledger."
                                }
                            }
                        }
                    }

                    tfoot
                    {
                        tr class="font-semibold text-gray-900 dark:text-white"
                        {
                            th scope="row" colspan="2" class=(TABLE_CELL_STYLE) { "Still to come" }
                            td colspan="2" class=(TABLE_CELL_STYLE) data-open-total="true"
                            { (format_currency(open_total(items))) }
                        }
                    }
                }
            }
        }
    )
}

fn ledger_row(item: &LedgerItem) -> Markup {
    let row_style = if item.is_cleared {
        CLEARED_ROW_STYLE
    } else {
        TABLE_ROW_STYLE
    };
    let debit_day = item.debit_day.map(|day| day.to_string()).unwrap_or_default();

    html!(
        tr class=(row_style) data-ledger-item-id=(item.id)
        {
            th scope="row" class="px-6 py-4 font-medium text-gray-900 dark:text-white"
            {
                div dir="rtl" { (item.name) }
                @if let Some(name_en) = &item.name_en {
                    div class="text-xs text-gray-500 dark:text-gray-400" { (name_en) }
                }
            }

            td class=(TABLE_CELL_STYLE) { (debit_day) }

            td class=(TABLE_CELL_STYLE)
            {
                form
                    hx-post=(format_endpoint(endpoints::LEDGER_ITEM_AMOUNT, item.id))
                    hx-target-error="#alert-container"
                    class="flex items-center gap-2"
                {
                    div class="input-wrapper"
                    {
                        input
                            type="number"
                            step="0.01"
                            name="amount"
                            value=(amount_input_value(item.amount))
                            aria-label=(format!("Amount for {}", item.name))
                            class=(FORM_INLINE_INPUT_STYLE);
                    }

                    button type="submit" class=(BUTTON_SECONDARY_STYLE) { "Save" }
                }
            }

            td class=(TABLE_CELL_STYLE)
            {
                @if item.is_cleared {
                    button
                        type="button"
                        hx-post=(format_endpoint(endpoints::UNCLEAR_LEDGER_ITEM, item.id))
                        hx-target-error="#alert-container"
                        class=(BUTTON_SECONDARY_STYLE)
                    {
                        "Undo"
                    }
                } @else {
                    button
                        type="button"
                        hx-post=(format_endpoint(endpoints::CLEAR_LEDGER_ITEM, item.id))
                        hx-target-error="#alert-container"
                        class=(BUTTON_SMALL_STYLE)
                    {
                        "Cleared"
                    }
                }
            }
        }
    )
}
