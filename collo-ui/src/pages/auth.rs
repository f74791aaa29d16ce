//! Auth Page
//!
//! E-mail/password sign-in and sign-up. A successful sign-in stores the
//! session and lands on the dashboard.

use leptos::*;
use leptos_router::use_navigate;

use crate::api;
use crate::state::GlobalState;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mode {
    SignIn,
    SignUp,
}

impl Mode {
    fn title(self) -> &'static str {
        match self {
            Mode::SignIn => "Welcome back",
            Mode::SignUp => "Create your account",
        }
    }

    fn submit_label(self) -> &'static str {
        match self {
            Mode::SignIn => "Sign In",
            Mode::SignUp => "Sign Up",
        }
    }

    fn switch_prompt(self) -> &'static str {
        match self {
            Mode::SignIn => "New to Collo? Create an account",
            Mode::SignUp => "Already have an account? Sign in",
        }
    }

    fn toggled(self) -> Self {
        match self {
            Mode::SignIn => Mode::SignUp,
            Mode::SignUp => Mode::SignIn,
        }
    }
}

/// Check the form before it goes to the API
///
/// The length rule only applies to new passwords.
fn validate_form(mode: Mode, email: &str, password: &str) -> Result<(), &'static str> {
    let email = email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err("Please enter a valid email address");
    }
    if password.is_empty() {
        return Err("Please enter your password");
    }
    if mode == Mode::SignUp && password.chars().count() < 6 {
        return Err("Password must be at least 6 characters");
    }
    Ok(())
}

/// Auth page component
#[component]
pub fn Auth() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let navigate = use_navigate();

    // A stored session goes straight to the dashboard, where the gate checks it
    if api::load_session().is_some() {
        navigate("/", Default::default());
    }

    let (mode, set_mode) = create_signal(Mode::SignIn);
    let (email, set_email) = create_signal(String::new());
    let (password, set_password) = create_signal(String::new());
    let (full_name, set_full_name) = create_signal(String::new());
    let (submitting, set_submitting) = create_signal(false);

    let submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();

        let current = mode.get();
        let email = email.get();
        let password = password.get();
        if let Err(msg) = validate_form(current, &email, &password) {
            state.show_error(msg);
            return;
        }

        let full_name = full_name.get();
        let state = state.clone();
        let navigate = navigate.clone();
        set_submitting.set(true);

        spawn_local(async move {
            let result = match current {
                Mode::SignIn => api::sign_in(email.trim(), &password).await.map(Some),
                Mode::SignUp => {
                    let name = Some(full_name.trim()).filter(|n| !n.is_empty());
                    api::sign_up(email.trim(), &password, name).await.map(|r| {
                        if r.confirmation_required {
                            state.show_success("Check your email to confirm your account");
                            set_mode.set(Mode::SignIn);
                        }
                        r.session
                    })
                }
            };

            match result {
                Ok(Some(session)) => {
                    state.begin_session(session);
                    navigate("/", Default::default());
                }
                Ok(None) => {}
                Err(e) => state.show_error(&e.to_string()),
            }
            set_submitting.set(false);
        });
    };

    view! {
        <div class="min-h-screen flex items-center justify-center p-6">
            <form
                on:submit=submit
                class="w-full max-w-md bg-card/50 backdrop-blur-collo p-8 border border-border rounded-xl space-y-4"
            >
                <div class="text-center mb-6">
                    <div class="text-[32px] font-bold bg-gradient-primary bg-clip-text text-transparent tracking-tight">
                        "COLLO"
                    </div>
                    <h1 class="text-xl font-bold mt-2">{move || mode.get().title()}</h1>
                </div>

                {move || (mode.get() == Mode::SignUp).then(|| view! {
                    <Field label="Full name" kind="text" value=full_name set_value=set_full_name />
                })}
                <Field label="Email" kind="email" value=email set_value=set_email />
                <Field label="Password" kind="password" value=password set_value=set_password />

                <button
                    type="submit"
                    disabled=move || submitting.get()
                    class="w-full px-4 py-3 rounded-lg bg-gradient-primary hover:opacity-90 font-medium disabled:opacity-50"
                >
                    {move || if submitting.get() { "Please wait..." } else { mode.get().submit_label() }}
                </button>

                <button
                    type="button"
                    on:click=move |_| set_mode.update(|m| *m = m.toggled())
                    class="w-full text-sm text-muted-foreground hover:text-white"
                >
                    {move || mode.get().switch_prompt()}
                </button>
            </form>
        </div>
    }
}

#[component]
fn Field(
    label: &'static str,
    kind: &'static str,
    value: ReadSignal<String>,
    set_value: WriteSignal<String>,
) -> impl IntoView {
    view! {
        <label class="block">
            <span class="block text-sm text-muted-foreground mb-2">{label}</span>
            <input
                type=kind
                prop:value=move || value.get()
                on:input=move |ev| set_value.set(event_target_value(&ev))
                class="w-full bg-white/5 rounded-lg px-4 py-3 border border-input focus:outline-none"
            />
        </label>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_form() {
        assert!(validate_form(Mode::SignUp, "student@collo.dev", "secret1").is_ok());
        assert!(validate_form(Mode::SignIn, "  ", "secret1").is_err());
        assert!(validate_form(Mode::SignIn, "student", "secret1").is_err());
        assert!(validate_form(Mode::SignIn, "student@collo.dev", "").is_err());
        assert!(validate_form(Mode::SignIn, "student@collo.dev", "123").is_ok());
        assert_eq!(
            validate_form(Mode::SignUp, "student@collo.dev", "123"),
            Err("Password must be at least 6 characters")
        );
    }

    #[test]
    fn test_mode_toggle() {
        assert!(Mode::SignIn.toggled() == Mode::SignUp);
        assert!(Mode::SignUp.toggled().toggled() == Mode::SignUp);
    }
}
