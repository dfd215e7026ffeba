use crate::config::PoststackConfig;
use leptos::*;

/// Provides the fallback Poststack configuration to every `<PoststackImage/>`
/// below this point.
///
/// This should go in the base of your Leptos <App/>.
///
/// Example
///
/// ```ignore
/// use leptos_poststack_image::*;
/// use leptos::*;
///
/// #[component]
/// pub fn App() -> impl IntoView {
///     provide_poststack_config(PoststackConfig::from_build_env());
///
///     view!{
///       <div/>
///     }
/// }
///
/// ```
pub fn provide_poststack_config(config: PoststackConfig) {
    leptos::provide_context(PoststackContext(config));
}

#[derive(Debug, Clone)]
struct PoststackContext(PoststackConfig);

/// The injected config, or an empty one (hardcoded endpoint only) when none
/// was provided.
pub fn use_poststack_config() -> PoststackConfig {
    use_context::<PoststackContext>()
        .map(|context| context.0)
        .unwrap_or_default()
}
