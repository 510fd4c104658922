use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;

mod api;
mod chart;
mod manager;
mod model;
mod state;

use api::{ApiClient, ApiConfig};
use manager::TransactionManager;

#[derive(Properties, PartialEq)]
struct AuthScreenProps {
    config: ApiConfig,
    on_authenticated: Callback<String>,
}

#[function_component(AuthScreen)]
fn auth_screen(props: &AuthScreenProps) -> Html {
    let is_login = use_state(|| true);
    let email = use_state(String::new);
    let password = use_state(String::new);
    let error = use_state(|| None::<String>);
    let notice = use_state(|| None::<String>);
    let loading = use_state(|| false);

    let on_submit = {
        let config = props.config.clone();
        let is_login = is_login.clone();
        let email = email.clone();
        let password = password.clone();
        let error = error.clone();
        let notice = notice.clone();
        let loading = loading.clone();
        let on_authenticated = props.on_authenticated.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let email_value = email.trim().to_string();
            let password_value = (*password).clone();

            if email_value.is_empty() || password_value.is_empty() {
                error.set(Some("Email and password are required".to_string()));
                return;
            }

            error.set(None);
            notice.set(None);
            loading.set(true);

            let config = config.clone();
            let is_login = is_login.clone();
            let email = email.clone();
            let password = password.clone();
            let error = error.clone();
            let notice = notice.clone();
            let loading = loading.clone();
            let on_authenticated = on_authenticated.clone();
            spawn_local(async move {
                if *is_login {
                    match api::login(&config, &email_value, &password_value).await {
                        Ok(token) => {
                            api::remember_token(&token);
                            on_authenticated.emit(token);
                        }
                        Err(err) => error.set(Some(err.to_string())),
                    }
                } else {
                    match api::register(&config, &email_value, &password_value).await {
                        Ok(()) => {
                            notice.set(Some(
                                "Account created. You can now log in.".to_string(),
                            ));
                            is_login.set(true);
                            email.set(String::new());
                            password.set(String::new());
                        }
                        Err(err) => error.set(Some(err.to_string())),
                    }
                }
                loading.set(false);
            });
        })
    };

    let toggle_mode = {
        let is_login = is_login.clone();
        let error = error.clone();
        let notice = notice.clone();
        Callback::from(move |_| {
            is_login.set(!*is_login);
            error.set(None);
            notice.set(None);
        })
    };

    html! {
        <div class="min-h-screen flex items-center justify-center bg-slate-100">
            <div class="w-full max-w-md bg-white border border-slate-200 rounded-2xl shadow-lg p-8">
                <div class="text-center mb-6">
                    <h1 class="text-2xl font-bold text-slate-800">
                        { if *is_login { "Welcome back" } else { "Create account" } }
                    </h1>
                    <p class="text-sm text-slate-500 mt-2">
                        { if *is_login { "Sign in to continue." } else { "Start managing your finances." } }
                    </p>
                </div>

                <form class="space-y-4" onsubmit={on_submit}>
                    <div class="space-y-1">
                        <label class="text-sm font-medium text-slate-700">{"Email"}</label>
                        <input
                            type="email"
                            class="w-full px-4 py-2 border border-slate-300 rounded-lg focus:outline-none focus:ring-2 focus:ring-slate-400"
                            value={(*email).clone()}
                            oninput={{
                                let email = email.clone();
                                Callback::from(move |e: InputEvent| {
                                    let input: HtmlInputElement = e.target_unchecked_into();
                                    email.set(input.value());
                                })
                            }}
                        />
                    </div>
                    <div class="space-y-1">
                        <label class="text-sm font-medium text-slate-700">{"Password"}</label>
                        <input
                            type="password"
                            class="w-full px-4 py-2 border border-slate-300 rounded-lg focus:outline-none focus:ring-2 focus:ring-slate-400"
                            value={(*password).clone()}
                            oninput={{
                                let password = password.clone();
                                Callback::from(move |e: InputEvent| {
                                    let input: HtmlInputElement = e.target_unchecked_into();
                                    password.set(input.value());
                                })
                            }}
                        />
                    </div>

                    if let Some(message) = &*error {
                        <p class="text-sm text-red-500">{ message.clone() }</p>
                    }
                    if let Some(message) = &*notice {
                        <p class="text-sm text-green-600">{ message.clone() }</p>
                    }

                    <button
                        type="submit"
                        class="w-full bg-slate-800 text-white py-2 rounded-lg font-semibold hover:opacity-90 transition-opacity"
                        disabled={*loading}
                    >
                        { if *loading { "Please wait..." } else if *is_login { "Login" } else { "Register" } }
                    </button>
                </form>

                <div class="mt-6 text-center text-sm text-slate-500">
                    { if *is_login { "You don't have an account?" } else { "You have an account?" } }
                    <button class="ml-2 text-slate-800 font-semibold" onclick={toggle_mode}>
                        { if *is_login { "Register" } else { "Log in" } }
                    </button>
                </div>
            </div>
        </div>
    }
}

#[function_component(App)]
fn app() -> Html {
    // the in-memory holder is authoritative; localStorage only seeds it so a
    // reload keeps the session
    let token = use_state(api::stored_token);

    let on_authenticated = {
        let token = token.clone();
        Callback::from(move |value: String| token.set(Some(value)))
    };

    let config = ApiConfig::default();

    match &*token {
        Some(value) => {
            let client = ApiClient::new(config, value.clone());
            html! { <TransactionManager client={client} /> }
        }
        None => html! { <AuthScreen config={config} on_authenticated={on_authenticated} /> },
    }
}

fn main() {
    yew::Renderer::<App>::new().render();
}
