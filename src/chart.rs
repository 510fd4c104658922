use yew::prelude::*;

use crate::model::PieSlice;
use crate::state::format_currency;

const PALETTE: [&str; 10] = [
    "#0ea5e9", "#22c55e", "#f59e0b", "#ef4444", "#8b5cf6", "#14b8a6", "#e11d48", "#a3e635",
    "#06b6d4", "#fb7185",
];

#[derive(Properties, PartialEq)]
pub struct PieChartProps {
    pub slices: Vec<PieSlice>,
}

/// Donut chart over the category breakdown, with a legend beside it. Each
/// slice is a circle stroke offset along the shared circumference.
#[function_component(PieChart)]
pub fn pie_chart(props: &PieChartProps) -> Html {
    let total: f64 = props.slices.iter().map(|slice| slice.value.max(0.0)).sum();
    if total <= 0.0 {
        return html! {};
    }

    let radius = 70.0_f64;
    let circumference = 2.0 * std::f64::consts::PI * radius;

    let mut consumed = 0.0;
    let segments = props
        .slices
        .iter()
        .enumerate()
        .map(|(idx, slice)| {
            let length = slice.value.max(0.0) / total * circumference;
            let dasharray = format!("{:.3} {:.3}", length, circumference);
            let dashoffset = format!("{:.3}", -consumed);
            consumed += length;
            html! {
                <circle
                    cx="100"
                    cy="100"
                    r={radius.to_string()}
                    fill="transparent"
                    stroke={PALETTE[idx % PALETTE.len()]}
                    stroke-width="42"
                    stroke-dasharray={dasharray}
                    stroke-dashoffset={dashoffset}
                />
            }
        })
        .collect::<Html>();

    html! {
        <div class="flex flex-col md:flex-row items-center gap-8">
            <svg viewBox="0 0 200 200" class="w-64 h-64 shrink-0 transform -rotate-90">
                { segments }
            </svg>
            <ul class="space-y-2 text-sm w-full md:w-auto">
                { for props.slices.iter().enumerate().map(|(idx, slice)| html! {
                    <li class="flex items-center gap-3">
                        <span
                            class="w-3 h-3 rounded-sm inline-block shrink-0"
                            style={format!("background: {}", PALETTE[idx % PALETTE.len()])}
                        ></span>
                        <span class="text-slate-600">{ slice.name.clone() }</span>
                        <span class="ml-auto pl-6 font-semibold text-slate-800">
                            { format_currency(slice.value) }
                        </span>
                    </li>
                }) }
            </ul>
        </div>
    }
}
