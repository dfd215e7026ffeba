use std::{cell::RefCell, rc::Rc};

use crate::config::resolve_credentials;
use crate::debounce::BrowserScheduler;
use crate::dimensions::{DimensionTracker, Dimensions};
use crate::format::{detect_format_support, FormatSupport};
use crate::proportions::{aspect_ratio, Proportions};
use crate::provider::use_poststack_config;
use crate::state::ImageState;

use leptos::leptos_dom::helpers::WindowListenerHandle;
use leptos::*;

const COVER_IMAGE_STYLE: &str =
    "position:absolute;top:0;right:0;bottom:0;left:0;width:100%;height:100%;object-fit:cover;";
const NATURAL_IMAGE_STYLE: &str = "display:block;width:100%;height:auto;object-fit:cover;";

/**
 * Responsive image served by the Poststack image service.
 *
 * Measures its container and the viewport, then requests the media sized for
 * them. Renders a placeholder when no project id / public key is available,
 * either as props or through `provide_poststack_config`.
 */

#[component]
pub fn PoststackImage(
    #[prop(into)] media_id: String,
    #[prop(into, optional)] project_id: Option<String>,
    #[prop(into, optional)] public_key: Option<String>,
    // Upper bound sent to the service instead of the measured width.
    #[prop(optional)] max_width: Option<u32>,
    #[prop(optional)] proportions: Option<Proportions>,
    #[prop(optional)] debug: bool,
    // Re-measure (debounced) when the window is resized.
    #[prop(into, optional)] responsive: MaybeSignal<bool>,
    #[prop(into, optional)] class: String,
    #[prop(attrs)] attrs: Vec<(&'static str, Attribute)>,
) -> impl IntoView {
    let credentials = resolve_credentials(
        project_id.as_deref(),
        public_key.as_deref(),
        &use_poststack_config(),
    );
    let ratio = aspect_ratio(proportions);

    let (dimensions, set_dimensions) = create_signal(Dimensions::default());
    let state = create_memo({
        let media_id = media_id.clone();
        move |_| ImageState::derive(credentials.clone(), &media_id, dimensions.get(), max_width)
    });

    // Credentials come from props and context, so only the measured
    // sub-state can change after this point.
    let project_id = match state.get_untracked() {
        ImageState::Unconfigured => {
            return view! { <MissingConfiguration ratio class attributes=attrs/> }.into_view();
        }
        ImageState::ConfiguredUnmeasured(credentials)
        | ImageState::ConfiguredReady { credentials, .. } => credentials.project_id,
    };

    let container = create_node_ref::<html::Div>();
    let (format_support, set_format_support) = create_signal(FormatSupport::default());

    let tracker = Rc::new(DimensionTracker::new(
        BrowserScheduler,
        move || read_dimensions(container),
        move |measured| {
            let _ = set_dimensions.try_set(measured);
        },
    ));

    container.on_load({
        let tracker = Rc::clone(&tracker);
        move |_| {
            // Wait for layout so the container has a width.
            request_animation_frame(move || tracker.mount());
            spawn_local(async move {
                let support = detect_format_support().await;
                let _ = set_format_support.try_set(support);
            });
        }
    });

    let resize_listener: Rc<RefCell<Option<WindowListenerHandle>>> = Rc::default();

    create_effect({
        let tracker = Rc::clone(&tracker);
        let resize_listener = Rc::clone(&resize_listener);
        let responsive = responsive.clone();
        move |_| {
            let responsive = responsive.get();
            tracker.set_responsive(responsive);

            let mut listener = resize_listener.borrow_mut();
            if responsive && listener.is_none() {
                let tracker = Rc::clone(&tracker);
                *listener = Some(window_event_listener(ev::resize, move |_| {
                    tracker.on_resize()
                }));
            } else if !responsive {
                if let Some(handle) = listener.take() {
                    handle.remove();
                }
            }
        }
    });

    on_cleanup(move || {
        tracker.unmount();
        if let Some(handle) = resize_listener.borrow_mut().take() {
            handle.remove();
        }
    });

    let wrapper_style = if ratio > 0.0 {
        format!("position:relative;width:100%;height:0;padding-bottom:{ratio}%;")
    } else {
        "position:relative;width:100%;".to_string()
    };
    let image_style = if ratio > 0.0 {
        COVER_IMAGE_STYLE
    } else {
        NATURAL_IMAGE_STYLE
    };

    let image = {
        let media_id = media_id.clone();
        move || match state.get() {
            ImageState::ConfiguredReady { url, .. } => {
                let media_id = media_id.clone();
                Some(view! {
                    <img
                        src=url
                        alt=""
                        loading="lazy"
                        style=image_style
                        on:error=move |_| {
                            log::warn!("poststack media `{media_id}` failed to load")
                        }
                    />
                })
            }
            ImageState::Unconfigured | ImageState::ConfiguredUnmeasured(_) => None,
        }
    };

    let overlay = debug.then(|| {
        view! {
            <DebugOverlay
                dimensions
                format_support
                project_id=project_id.clone()
                media_id=media_id.clone()
                responsive=responsive.clone()
            />
        }
    });

    view! {
        <div node_ref=container class=class style="position:relative;width:100%;" {..attrs}>
            <div style=wrapper_style>{image} {overlay}</div>
        </div>
    }
    .into_view()
}

fn read_dimensions(container: NodeRef<html::Div>) -> Dimensions {
    #[cfg(feature = "browser")]
    {
        use wasm_bindgen::JsCast;

        let element = container.get_untracked();
        crate::dimensions::measure_dimensions(
            element
                .as_ref()
                .map(|el| el.unchecked_ref::<web_sys::HtmlElement>()),
        )
    }
    #[cfg(not(feature = "browser"))]
    {
        let _ = container;
        Dimensions::default()
    }
}

#[component]
fn MissingConfiguration(
    ratio: f64,
    class: String,
    attributes: Vec<(&'static str, Attribute)>,
) -> impl IntoView {
    let box_style = if ratio > 0.0 {
        format!("position:relative;width:100%;padding-bottom:{ratio}%;border-radius:0.5rem;overflow:hidden;background:#f1f5f9;")
    } else {
        "position:relative;width:100%;min-height:200px;border-radius:0.5rem;overflow:hidden;background:#f1f5f9;".to_string()
    };

    view! {
        <div class=class style="position:relative;width:100%;" {..attributes}>
            <div style=box_style>
                <div style="position:absolute;top:0;right:0;bottom:0;left:0;display:flex;align-items:center;justify-content:center;">
                    <div style="text-align:center;padding:1rem;color:#64748b;">
                        <p style="font-size:1rem;font-weight:500;margin:0;">"Missing Configuration"</p>
                        <p style="font-size:0.875rem;margin:0.25rem 0 0;">
                            "Please provide a project ID and public key"
                        </p>
                    </div>
                </div>
            </div>
        </div>
    }
}

#[component]
fn DebugOverlay(
    dimensions: ReadSignal<Dimensions>,
    format_support: ReadSignal<FormatSupport>,
    project_id: String,
    media_id: String,
    responsive: MaybeSignal<bool>,
) -> impl IntoView {
    view! {
        <div style="position:absolute;top:0;left:0;z-index:10;padding:0.5rem;background:rgba(0,0,0,0.75);color:#fff;font-family:monospace;font-size:0.75rem;">
            <div>"Element Width: " {move || dimensions.get().element_width} "px"</div>
            <div>"Viewport Width: " {move || dimensions.get().viewport_width} "px"</div>
            <div>"Format Support: " {move || format_support.get().to_string()}</div>
            <div>"Project ID: " {project_id}</div>
            <div>"Media ID: " {media_id}</div>
            <div>"Responsive: " {move || responsive.get().to_string()}</div>
        </div>
    }
}
