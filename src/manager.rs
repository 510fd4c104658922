use gloo_console::error as console_error;
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

use crate::api::ApiClient;
use crate::chart::PieChart;
use crate::model::{Category, PieSlice, Transaction, TransactionKind};
use crate::state::{
    category_names, format_currency, format_date, running_budget, sort_newest_first, EntryForm,
};

#[derive(Properties, PartialEq)]
pub struct ManagerProps {
    pub client: ApiClient,
}

async fn load_transactions(
    client: ApiClient,
    transactions: UseStateHandle<Vec<Transaction>>,
    loading: UseStateHandle<bool>,
    error: UseStateHandle<Option<String>>,
) {
    loading.set(true);
    error.set(None);
    match client.transactions().await {
        Ok(mut list) => {
            sort_newest_first(&mut list);
            transactions.set(list);
        }
        Err(err) => error.set(Some(err.to_string())),
    }
    loading.set(false);
}

// The pie shares the store's error slot; it only writes when the slot is
// empty so parallel failures do not stack.
async fn refresh_pie(
    client: ApiClient,
    pie: UseStateHandle<Vec<PieSlice>>,
    pie_loading: UseStateHandle<bool>,
    error: UseStateHandle<Option<String>>,
) {
    pie_loading.set(true);
    match client.pie_chart().await {
        Ok(slices) => pie.set(slices),
        Err(err) => {
            console_error!(format!("piechart refresh failed: {}", err));
            if error.is_none() {
                error.set(Some(err.to_string()));
            }
        }
    }
    pie_loading.set(false);
}

async fn load_categories(
    client: ApiClient,
    categories: UseStateHandle<Vec<Category>>,
    cat_loading: UseStateHandle<bool>,
) {
    cat_loading.set(true);
    categories.set(client.categories().await);
    cat_loading.set(false);
}

#[function_component(TransactionManager)]
pub fn transaction_manager(props: &ManagerProps) -> Html {
    let transactions = use_state(Vec::<Transaction>::new);
    let loading = use_state(|| false);
    let error = use_state(|| None::<String>);

    let pie = use_state(Vec::<PieSlice>::new);
    let pie_loading = use_state(|| false);

    let categories = use_state(Vec::<Category>::new);
    let cat_loading = use_state(|| false);

    let form = use_state(EntryForm::default);

    // the three initial fetches run concurrently, each with its own flag
    {
        let transactions = transactions.clone();
        let loading = loading.clone();
        let error = error.clone();
        let pie = pie.clone();
        let pie_loading = pie_loading.clone();
        let categories = categories.clone();
        let cat_loading = cat_loading.clone();
        use_effect_with_deps(
            move |client: &ApiClient| {
                spawn_local(load_transactions(
                    client.clone(),
                    transactions,
                    loading,
                    error.clone(),
                ));
                spawn_local(refresh_pie(client.clone(), pie, pie_loading, error));
                spawn_local(load_categories(client.clone(), categories, cat_loading));
                || ()
            },
            props.client.clone(),
        );
    }

    let on_reload_transactions = {
        let client = props.client.clone();
        let transactions = transactions.clone();
        let loading = loading.clone();
        let error = error.clone();
        Callback::from(move |_| {
            spawn_local(load_transactions(
                client.clone(),
                transactions.clone(),
                loading.clone(),
                error.clone(),
            ));
        })
    };

    let on_refresh_pie = {
        let client = props.client.clone();
        let pie = pie.clone();
        let pie_loading = pie_loading.clone();
        let error = error.clone();
        Callback::from(move |_| {
            spawn_local(refresh_pie(
                client.clone(),
                pie.clone(),
                pie_loading.clone(),
                error.clone(),
            ));
        })
    };

    let on_kind_change = {
        let form = form.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            let mut next = (*form).clone();
            next.kind = TransactionKind::from_value(&select.value());
            form.set(next);
        })
    };

    let on_category_change = {
        let form = form.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            let mut next = (*form).clone();
            next.category_id = select.value();
            form.set(next);
        })
    };

    let on_amount_input = {
        let form = form.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let mut next = (*form).clone();
            next.amount = input.value();
            form.set(next);
        })
    };

    let on_description_input = {
        let form = form.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let mut next = (*form).clone();
            next.description = input.value();
            form.set(next);
        })
    };

    let on_submit = {
        let client = props.client.clone();
        let form = form.clone();
        let transactions = transactions.clone();
        let loading = loading.clone();
        let error = error.clone();
        let pie = pie.clone();
        let pie_loading = pie_loading.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            error.set(None);

            // validation happens before any request goes out
            let payload = match form.validate() {
                Ok(payload) => payload,
                Err(message) => {
                    error.set(Some(message));
                    return;
                }
            };

            let client = client.clone();
            let form = form.clone();
            let transactions = transactions.clone();
            let loading = loading.clone();
            let error = error.clone();
            let pie = pie.clone();
            let pie_loading = pie_loading.clone();
            spawn_local(async move {
                match client.create_transaction(&payload).await {
                    Ok(()) => {
                        form.set(form.cleared());
                        // reload the list and the chart concurrently
                        spawn_local(load_transactions(
                            client.clone(),
                            transactions,
                            loading,
                            error.clone(),
                        ));
                        spawn_local(refresh_pie(client, pie, pie_loading, error));
                    }
                    Err(err) => error.set(Some(err.to_string())),
                }
            });
        })
    };

    let on_delete = {
        let client = props.client.clone();
        let transactions = transactions.clone();
        let error = error.clone();
        let pie = pie.clone();
        let pie_loading = pie_loading.clone();
        Callback::from(move |id: i64| {
            let confirmed = web_sys::window()
                .map(|w| w.confirm_with_message("Delete this transaction?").unwrap_or(false))
                .unwrap_or(false);
            if !confirmed {
                return;
            }

            let client = client.clone();
            let transactions = transactions.clone();
            let error = error.clone();
            let pie = pie.clone();
            let pie_loading = pie_loading.clone();
            spawn_local(async move {
                match client.delete_transaction(id).await {
                    Ok(()) => {
                        // optimistic removal, no re-fetch of the list
                        let next: Vec<Transaction> = transactions
                            .iter()
                            .filter(|tx| tx.id != id)
                            .cloned()
                            .collect();
                        transactions.set(next);
                        spawn_local(refresh_pie(client, pie, pie_loading, error));
                    }
                    Err(err) => error.set(Some(err.to_string())),
                }
            });
        })
    };

    let budget = running_budget(&transactions);
    let budget_class = if budget >= 0.0 {
        "text-4xl font-bold text-green-600"
    } else {
        "text-4xl font-bold text-red-600"
    };
    let lookup = category_names(&categories);

    html! {
        <div class="max-w-5xl mx-auto p-6 space-y-6">
            <div class="flex flex-wrap items-end justify-between gap-4">
                <div>
                    <h1 class="text-2xl font-bold text-slate-800">{"Expense Tracker"}</h1>
                    <p class="text-sm text-slate-500">{"Add expenses and income"}</p>
                </div>
                <div class="text-right">
                    <p class="text-sm text-slate-500">{"Current Budget"}</p>
                    <p class={budget_class}>{ format_currency(budget) }</p>
                </div>
            </div>

            <div class="bg-white rounded-2xl shadow-sm border border-slate-200 p-6">
                <h2 class="text-lg font-semibold text-slate-800 mb-4">{"New Transaction"}</h2>
                <form class="grid grid-cols-1 md:grid-cols-5 gap-3 items-end" onsubmit={on_submit}>
                    <div class="space-y-1">
                        <label class="text-sm font-medium text-slate-600">{"Type"}</label>
                        <select
                            class="w-full p-2 border border-slate-300 rounded-lg"
                            value={form.kind.as_str()}
                            onchange={on_kind_change}
                        >
                            <option value="income">{"Income"}</option>
                            <option value="expense">{"Expense"}</option>
                        </select>
                    </div>
                    <div class="space-y-1">
                        <label class="text-sm font-medium text-slate-600">{"Category"}</label>
                        <select
                            class="w-full p-2 border border-slate-300 rounded-lg"
                            value={form.category_id.clone()}
                            onchange={on_category_change}
                            disabled={*cat_loading}
                        >
                            <option value="">
                                { if *cat_loading { "Loading..." } else { "Select a category" } }
                            </option>
                            { for categories.iter().map(|category| html! {
                                <option value={category.id.to_string()}>{ category.name.clone() }</option>
                            }) }
                        </select>
                    </div>
                    <div class="space-y-1">
                        <label class="text-sm font-medium text-slate-600">{"Amount"}</label>
                        <input
                            type="number"
                            min="0"
                            step="0.01"
                            placeholder="0.00"
                            class="w-full p-2 border border-slate-300 rounded-lg"
                            value={form.amount.clone()}
                            oninput={on_amount_input}
                        />
                    </div>
                    <div class="space-y-1">
                        <label class="text-sm font-medium text-slate-600">{"Description"}</label>
                        <input
                            type="text"
                            placeholder="Optional"
                            class="w-full p-2 border border-slate-300 rounded-lg"
                            value={form.description.clone()}
                            oninput={on_description_input}
                        />
                    </div>
                    <button
                        type="submit"
                        class="bg-slate-800 text-white py-2 px-4 rounded-lg font-semibold hover:opacity-90 transition-opacity"
                        disabled={*loading}
                    >
                        { if *loading { "Saving..." } else { "Add" } }
                    </button>
                </form>
                if let Some(message) = &*error {
                    <p class="mt-3 text-sm text-red-500">{ message.clone() }</p>
                }
            </div>

            <div class="bg-white rounded-2xl shadow-sm border border-slate-200 p-6">
                <div class="flex items-center justify-between mb-4">
                    <h2 class="text-lg font-semibold text-slate-800">{"Expenses by Category"}</h2>
                    <button
                        class="text-sm border border-slate-300 rounded-lg px-3 py-1 text-slate-600 hover:bg-slate-50"
                        onclick={on_refresh_pie}
                        disabled={*pie_loading}
                    >
                        { if *pie_loading { "Updating..." } else { "Refresh" } }
                    </button>
                </div>
                if pie.is_empty() && !*pie_loading {
                    <p class="text-sm text-slate-500 py-10 text-center">{"No expense data"}</p>
                } else {
                    <PieChart slices={(*pie).clone()} />
                }
            </div>

            <div class="bg-white rounded-2xl shadow-sm border border-slate-200 overflow-hidden">
                <div class="p-6 flex items-center justify-between border-b border-slate-200">
                    <h2 class="text-lg font-semibold text-slate-800">{"Transactions"}</h2>
                    <button
                        class="text-sm border border-slate-300 rounded-lg px-3 py-1 text-slate-600 hover:bg-slate-50"
                        onclick={on_reload_transactions}
                        disabled={*loading}
                    >
                        { if *loading { "Updating..." } else { "Refresh" } }
                    </button>
                </div>
                <div class="overflow-x-auto">
                    <table class="w-full text-left border-collapse">
                        <thead>
                            <tr class="text-xs uppercase tracking-wider text-slate-500 bg-slate-50">
                                <th class="px-6 py-3 font-semibold">{"Date"}</th>
                                <th class="px-6 py-3 font-semibold">{"Type"}</th>
                                <th class="px-6 py-3 font-semibold">{"Category"}</th>
                                <th class="px-6 py-3 font-semibold">{"Description"}</th>
                                <th class="px-6 py-3 font-semibold text-right">{"Amount"}</th>
                                <th class="px-6 py-3 font-semibold">{"Actions"}</th>
                            </tr>
                        </thead>
                        <tbody class="divide-y divide-slate-100">
                            if transactions.is_empty() && !*loading {
                                <tr>
                                    <td colspan="6" class="px-6 py-8 text-center text-slate-500">
                                        {"No transactions."}
                                    </td>
                                </tr>
                            }
                            { for transactions.iter().map(|tx| {
                                let on_delete = on_delete.clone();
                                let id = tx.id;
                                let category = lookup
                                    .get(&tx.category_id.to_string())
                                    .cloned()
                                    .unwrap_or_else(|| tx.category_id.to_string());
                                let signed = match tx.kind {
                                    TransactionKind::Income => tx.amount,
                                    TransactionKind::Expense => -tx.amount,
                                };
                                let badge = match tx.kind {
                                    TransactionKind::Income => {
                                        "px-3 py-1 rounded-full text-xs font-bold bg-green-100 text-green-700"
                                    }
                                    TransactionKind::Expense => {
                                        "px-3 py-1 rounded-full text-xs font-bold bg-red-100 text-red-700"
                                    }
                                };
                                html! {
                                    <tr key={tx.id.to_string()} class="text-sm hover:bg-slate-50 transition-colors">
                                        <td class="px-6 py-4 text-slate-500">{ format_date(&tx.date) }</td>
                                        <td class="px-6 py-4">
                                            <span class={badge}>{ tx.kind.as_str() }</span>
                                        </td>
                                        <td class="px-6 py-4 text-slate-700">{ category }</td>
                                        <td class="px-6 py-4 text-slate-700">
                                            { tx.description.clone().unwrap_or_else(|| "\u{2014}".to_string()) }
                                        </td>
                                        <td class="px-6 py-4 text-right font-semibold text-slate-800">
                                            { format_currency(signed) }
                                        </td>
                                        <td class="px-6 py-4">
                                            <button
                                                class="text-sm text-red-500 hover:underline"
                                                onclick={Callback::from(move |_| on_delete.emit(id))}
                                            >
                                                {"Delete"}
                                            </button>
                                        </td>
                                    </tr>
                                }
                            }) }
                        </tbody>
                    </table>
                </div>
            </div>
        </div>
    }
}
