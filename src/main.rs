mod api;
mod chart;
mod report;

use serde::{Deserialize, Serialize};
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlCanvasElement;
use yew::prelude::*;

use chart::{ChartHandle, ChartSpec};
use report::{format_currency, ExpenseInput, Report};

const CATEGORIAS: [&str; 6] = [
    "Comida",
    "Transporte",
    "Servicios",
    "Entretenimiento",
    "Salud",
    "Otros",
];

#[derive(Clone, PartialEq, Serialize, Deserialize)]
struct AppSettings {
    currency_code: String,
    currency_symbol: String,
}

fn default_settings() -> AppSettings {
    AppSettings {
        currency_code: "USD".to_string(),
        currency_symbol: "$".to_string(),
    }
}

fn load_settings() -> AppSettings {
    if let Some(window) = web_sys::window() {
        if let Ok(Some(storage)) = window.local_storage() {
            if let Ok(Some(raw)) = storage.get_item("settings") {
                if let Ok(settings) = serde_json::from_str::<AppSettings>(&raw) {
                    return settings;
                }
            }
        }
    }
    default_settings()
}

fn save_settings(settings: &AppSettings) {
    if let Some(window) = web_sys::window() {
        if let Ok(Some(storage)) = window.local_storage() {
            if let Ok(raw) = serde_json::to_string(settings) {
                let _ = storage.set_item("settings", &raw);
            }
        }
    }
}

fn currency_symbol_for(code: &str) -> &'static str {
    match code {
        "EUR" => "€",
        "GBP" => "£",
        "JPY" => "¥",
        _ => "$",
    }
}

#[function_component(Header)]
fn header() -> Html {
    let settings = use_context::<UseStateHandle<AppSettings>>();
    let current_currency = settings
        .as_ref()
        .map(|s| s.currency_code.clone())
        .unwrap_or_else(|| "USD".to_string());

    let on_currency_change = {
        let settings = settings.clone();
        Callback::from(move |e: Event| {
            if let Some(settings) = settings.as_ref() {
                let input: web_sys::HtmlSelectElement = e.target_unchecked_into();
                let code = input.value();
                let symbol = currency_symbol_for(&code).to_string();
                let next = AppSettings {
                    currency_code: code,
                    currency_symbol: symbol,
                };
                save_settings(&next);
                settings.set(next);
            }
        })
    };

    html! {
        <header class="bg-[#173E63] h-16 flex items-center justify-between px-6 shadow-md">
            <div class="flex items-center gap-3 text-white">
                { icon_wallet() }
                <h1 class="text-xl font-black tracking-tight">{"Control de Gastos"}</h1>
            </div>
            <div class="flex items-center gap-2">
                <label class="text-slate-300 text-[10px] font-bold uppercase tracking-widest">{"Moneda"}</label>
                <select value={current_currency} onchange={on_currency_change} class="bg-white/10 text-white text-xs font-bold rounded-lg px-2 py-1 outline-none">
                    <option value="USD">{"USD ($)"}</option>
                    <option value="EUR">{"EUR (€)"}</option>
                    <option value="GBP">{"GBP (£)"}</option>
                    <option value="JPY">{"JPY (¥)"}</option>
                </select>
            </div>
        </header>
    }
}

#[derive(Properties, PartialEq)]
struct ExpenseFormProps {
    on_saved: Callback<String>,
}

#[function_component(ExpenseForm)]
fn expense_form(props: &ExpenseFormProps) -> Html {
    let settings = use_context::<UseStateHandle<AppSettings>>();
    let currency_symbol = settings
        .as_ref()
        .map(|s| s.currency_symbol.clone())
        .unwrap_or_else(|| "$".to_string());

    let form_categoria = use_state(|| CATEGORIAS[0].to_string());
    let form_descripcion = use_state(|| "".to_string());
    let form_monto = use_state(|| "".to_string());
    let form_fecha = use_state(|| "".to_string());
    let form_error = use_state(|| None::<String>);
    let saving = use_state(|| false);

    let on_submit = {
        let form_categoria = form_categoria.clone();
        let form_descripcion = form_descripcion.clone();
        let form_monto = form_monto.clone();
        let form_fecha = form_fecha.clone();
        let form_error = form_error.clone();
        let saving = saving.clone();
        let on_saved = props.on_saved.clone();

        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();

            // field values are read now, at submission time
            let input = ExpenseInput {
                categoria: form_categoria.trim().to_string(),
                descripcion: form_descripcion.trim().to_string(),
                monto: form_monto.trim().parse::<f64>().unwrap_or(f64::NAN),
                fecha: if form_fecha.is_empty() {
                    None
                } else {
                    Some(form_fecha.to_string())
                },
            };

            form_error.set(None);
            saving.set(true);

            let form_categoria = form_categoria.clone();
            let form_descripcion = form_descripcion.clone();
            let form_monto = form_monto.clone();
            let form_fecha = form_fecha.clone();
            let form_error = form_error.clone();
            let saving = saving.clone();
            let on_saved = on_saved.clone();
            spawn_local(async move {
                match api::submit_gasto(&input).await {
                    Ok(mensaje) => {
                        // reset form
                        form_categoria.set(CATEGORIAS[0].to_string());
                        form_descripcion.set("".to_string());
                        form_monto.set("".to_string());
                        form_fecha.set("".to_string());
                        on_saved.emit(mensaje);
                    }
                    Err(err) => {
                        log::error!("no se pudo guardar el gasto: {err}");
                        form_error.set(Some(err.to_string()));
                    }
                }
                saving.set(false);
            });
        })
    };

    html! {
        <div class="bg-white p-6 rounded-[10px] shadow-sm border border-white/50">
            <div class="flex items-center gap-2 mb-4">
                <div class="p-1.5 bg-[#f1f5f9] rounded-lg">{ icon_plus() }</div>
                <h4 class="text-[#1D617A] font-bold text-[15px] tracking-wider">{"Agregar Gasto"}</h4>
            </div>
            <form onsubmit={on_submit}>
                <div class="grid grid-cols-2 md:grid-cols-4 gap-3 mb-4">
                    <div class="space-y-1">
                        <label class="text-[12px] font-bold text-slate-400">{"Categoría"}</label>
                        <select value={(*form_categoria).clone()} onchange={{
                            let form_categoria = form_categoria.clone();
                            Callback::from(move |e: Event| {
                                let input: web_sys::HtmlSelectElement = e.target_unchecked_into();
                                form_categoria.set(input.value());
                            })
                        }} class="w-full bg-[#f1f4f9] rounded-[10px] px-3 py-2 text-[11px] text-[#173E63] border-none outline-none">
                            { for CATEGORIAS.iter().map(|cat| html! { <option value={*cat}>{ *cat }</option> }) }
                        </select>
                    </div>
                    <div class="space-y-1">
                        <label class="text-[12px] font-bold text-slate-400">{"Descripción"}</label>
                        <input type="text" required=true placeholder="¿En qué gastaste?" value={(*form_descripcion).clone()} oninput={{
                            let form_descripcion = form_descripcion.clone();
                            Callback::from(move |e: InputEvent| {
                                let input: web_sys::HtmlInputElement = e.target_unchecked_into();
                                form_descripcion.set(input.value());
                            })
                        }} class="w-full bg-[#f1f4f9] rounded-[10px] px-3 py-2 text-[11px] text-[#173E63] border-none" />
                    </div>
                    <div class="space-y-1">
                        <label class="text-[12px] font-bold text-slate-400">{ format!("Monto ({})", currency_symbol) }</label>
                        <input type="number" step="0.01" required=true placeholder={format!("{} 0.00", currency_symbol)} value={(*form_monto).clone()} oninput={{
                            let form_monto = form_monto.clone();
                            Callback::from(move |e: InputEvent| {
                                let input: web_sys::HtmlInputElement = e.target_unchecked_into();
                                form_monto.set(input.value());
                            })
                        }} class="w-full bg-[#f1f4f9] rounded-[10px] px-3 py-2 text-[11px] text-[#173E63] border-none" />
                    </div>
                    <div class="space-y-1">
                        <label class="text-[12px] font-bold text-slate-400">{"Fecha"}</label>
                        <input type="date" value={(*form_fecha).clone()} oninput={{
                            let form_fecha = form_fecha.clone();
                            Callback::from(move |e: InputEvent| {
                                let input: web_sys::HtmlInputElement = e.target_unchecked_into();
                                form_fecha.set(input.value());
                            })
                        }} class="w-full bg-[#f1f4f9] rounded-[10px] px-3 py-2 text-[11px] text-[#173E63] border-none" />
                    </div>
                </div>
                <button type="submit" class="w-full bg-[#173E63] text-white py-2 rounded-[10px] text-[10px] font-bold flex items-center justify-center gap-2" disabled={*saving}>
                    { if *saving { "Guardando..." } else { "Guardar Gasto" } }
                </button>
                {
                    if let Some(msg) = &*form_error {
                        html! { <p class="text-sm text-red-500 mt-3">{ msg.clone() }</p> }
                    } else {
                        html! {}
                    }
                }
            </form>
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct ReportChartProps {
    report: Option<Report>,
}

#[function_component(ReportChart)]
fn report_chart(props: &ReportChartProps) -> Html {
    let canvas_ref = use_node_ref();

    {
        let canvas_ref = canvas_ref.clone();
        use_effect_with_deps(
            move |report: &Option<Report>| {
                let handle = report
                    .as_ref()
                    .filter(|r| !r.is_empty())
                    .zip(canvas_ref.cast::<HtmlCanvasElement>())
                    .and_then(|(r, canvas)| {
                        match ChartHandle::render(&canvas, &ChartSpec::pie(r)) {
                            Ok(handle) => Some(handle),
                            Err(err) => {
                                log::error!("no se pudo dibujar el gráfico: {err:?}");
                                None
                            }
                        }
                    });
                // teardown runs before the next draw, so at most one chart
                // instance is ever alive
                move || {
                    if let Some(handle) = handle {
                        handle.destroy();
                    }
                }
            },
            props.report.clone(),
        );
    }

    html! {
        <div class="relative max-w-md mx-auto">
            <canvas ref={canvas_ref}></canvas>
        </div>
    }
}

#[function_component(GastosPage)]
fn gastos_page() -> Html {
    let settings = use_context::<UseStateHandle<AppSettings>>();
    let currency_symbol = settings
        .as_ref()
        .map(|s| s.currency_symbol.clone())
        .unwrap_or_else(|| "$".to_string());

    let report = use_state(|| None::<Report>);
    let status = use_state(|| None::<String>);
    let fetch_error = use_state(|| None::<String>);
    let mes = use_state(|| "".to_string());
    let fetch_seq = use_mut_ref(|| 0u64);

    let refresh = {
        let report = report.clone();
        let fetch_error = fetch_error.clone();
        let mes = mes.clone();
        let fetch_seq = fetch_seq.clone();
        Callback::from(move |_: ()| {
            let report = report.clone();
            let fetch_error = fetch_error.clone();
            let fetch_seq = fetch_seq.clone();
            let mes_val = mes.trim().to_string();
            let seq = {
                let mut counter = fetch_seq.borrow_mut();
                *counter += 1;
                *counter
            };
            spawn_local(async move {
                let outcome = api::fetch_report(&mes_val).await;
                // a newer refresh was issued while this one was in flight
                if *fetch_seq.borrow() != seq {
                    return;
                }
                match outcome {
                    Ok(data) => {
                        report.set(Some(data));
                        fetch_error.set(None);
                    }
                    Err(err) => {
                        log::error!("no se pudo cargar el reporte: {err}");
                        fetch_error.set(Some(err.to_string()));
                    }
                }
            });
        })
    };

    // initial load
    {
        let refresh = refresh.clone();
        use_effect_with_deps(
            move |_| {
                refresh.emit(());
                || ()
            },
            (),
        );
    }

    let on_saved = {
        let status = status.clone();
        let refresh = refresh.clone();
        Callback::from(move |mensaje: String| {
            status.set(Some(mensaje));
            refresh.emit(());
        })
    };

    let on_filter = {
        let refresh = refresh.clone();
        Callback::from(move |_: MouseEvent| refresh.emit(()))
    };

    let on_mes_input = {
        let mes = mes.clone();
        Callback::from(move |e: InputEvent| {
            let input: web_sys::HtmlInputElement = e.target_unchecked_into();
            mes.set(input.value());
        })
    };

    let table_body = match &*report {
        None => html! {},
        Some(rep) if rep.is_empty() => html! {
            <tr>
                <td colspan="2" class="px-8 py-6 text-center text-slate-400">{"Sin datos disponibles"}</td>
            </tr>
        },
        Some(rep) => html! {
            <>
                { for rep.entries.iter().enumerate().map(|(idx, entry)| html! {
                    <tr key={idx} class="text-sm hover:bg-slate-50 transition-colors">
                        <td class="px-8 py-4">
                            <span class="bg-[#dae3f0] text-[#173E63] px-3 py-1 rounded-full text-[10px] font-bold">{ entry.categoria.clone() }</span>
                        </td>
                        <td class="px-8 py-4 text-right font-semibold text-[#173E63]">{ format_currency(entry.monto, &currency_symbol) }</td>
                    </tr>
                }) }
            </>
        },
    };

    let total_label = match &*report {
        None => None,
        Some(rep) if rep.is_empty() => Some(format_currency(0.0, &currency_symbol)),
        Some(rep) => rep.total.map(|t| format_currency(t, &currency_symbol)),
    };

    html! {
        <div class="p-6 max-w-5xl mx-auto space-y-6">
            {
                if let Some(msg) = &*status {
                    html! { <p class="text-sm text-green-600 bg-green-50 border border-green-200 rounded-lg px-4 py-2">{ msg.clone() }</p> }
                } else {
                    html! {}
                }
            }
            {
                if let Some(msg) = &*fetch_error {
                    html! { <p class="text-sm text-red-500 bg-red-50 border border-red-200 rounded-lg px-4 py-2">{ msg.clone() }</p> }
                } else {
                    html! {}
                }
            }

            <ExpenseForm on_saved={on_saved} />

            <div class="bg-white rounded-[10px] shadow-sm border border-white/50 overflow-hidden">
                <div class="p-5 border-b border-slate-100 flex items-center justify-between">
                    <div class="flex items-center gap-2">
                        <div class="p-1.5 bg-[#f1f5f9] rounded-lg">{ icon_bar_chart() }</div>
                        <h3 class="font-bold text-lg text-[#173E63]">{"Reporte Mensual"}</h3>
                    </div>
                    <div class="flex items-center gap-2">
                        <input type="month" value={(*mes).clone()} oninput={on_mes_input} class="bg-[#f1f4f9] rounded-[10px] px-3 py-2 text-[11px] text-[#173E63] border-none" />
                        <button onclick={on_filter} class="bg-[#1D617A] text-white px-4 py-2 rounded-[10px] text-[10px] font-bold">{"Filtrar"}</button>
                    </div>
                </div>

                <div class="grid grid-cols-1 lg:grid-cols-2 gap-6 p-6 items-start">
                    <ReportChart report={(*report).clone()} />

                    <div class="overflow-x-auto">
                        <table class="w-full text-left border-collapse">
                            <thead>
                                <tr class="bg-slate-50 text-slate-400 text-[10px] uppercase tracking-widest">
                                    <th class="px-8 py-4 font-bold">{"Categoría"}</th>
                                    <th class="px-8 py-4 font-bold text-right">{"Total"}</th>
                                </tr>
                            </thead>
                            <tbody class="divide-y divide-slate-100">
                                { table_body }
                            </tbody>
                        </table>
                        {
                            if let Some(total) = total_label {
                                html! {
                                    <div class="flex items-center justify-between px-8 py-4 border-t border-slate-100">
                                        <span class="text-[10px] font-bold text-slate-400 uppercase tracking-widest">{"Total del mes"}</span>
                                        <span class="text-lg font-black text-[#1D617A]">{ total }</span>
                                    </div>
                                }
                            } else {
                                html! {}
                            }
                        }
                    </div>
                </div>
            </div>
        </div>
    }
}

#[function_component(App)]
fn app() -> Html {
    let settings = use_state(load_settings);

    html! {
        <ContextProvider<UseStateHandle<AppSettings>> context={settings}>
            <div class="min-h-screen bg-slate-100">
                <Header />
                <main>
                    <GastosPage />
                </main>
            </div>
        </ContextProvider<UseStateHandle<AppSettings>>>
    }
}

fn icon_base(path: &'static str) -> Html {
    html! {
        <svg width="20" height="20" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round">
            <path d={path}></path>
        </svg>
    }
}

fn icon_wallet() -> Html {
    icon_base("M3 7h18v10H3zM16 7V5H5v2")
}
fn icon_bar_chart() -> Html {
    icon_base("M4 20V10M10 20V4M16 20v-6M22 20H2")
}
fn icon_plus() -> Html {
    icon_base("M12 5v14M5 12h14")
}

fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    yew::Renderer::<App>::new().render();
}
