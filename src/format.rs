use std::fmt;

use futures::future::LocalBoxFuture;
use serde::{Deserialize, Serialize};

const AVIF_PROBE: &str = "data:image/avif;base64,AAAAIGZ0eXBhdmlmAAAAAGF2aWZtaWYxbWlhZk1BMUIAAADybWV0YQAAAAAAAAAoaGRscgAAAAAAAAAAcGljdAAAAAAAAAAAAAAAAGxpYmF2aWYAAAAADnBpdG0AAAAAAAEAAAAeaWxvYwAAAABEAAABAAEAAAABAAABGgAAAB0AAAAoaWluZgAAAAAAAQAAABppbmZlAgAAAAABAABhdjAxQ29sb3IAAAAAamlwcnAAAABLaXBjbwAAABRpc3BlAAAAAAAAAAIAAAACAAAAEHBpeGkAAAAAAwgICAAAAAxhdjFDgQ0MAAAAABNjb2xybmNseAACAAIAAYAAAAAXaXBtYQAAAAAAAAABAAEEAQKDBAAAACVtZGF0EgAKCBgANogQEAwgMg8f8D///8WfhwB8+ErK42A=";
const WEBP_PROBE: &str = "data:image/webp;base64,UklGRhoAAABXRUJQVlA4TA0AAAAvAAAAEAcQERGIiP4HAA==";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    Avif,
    Webp,
}

impl ImageFormat {
    /// A 1x1 image in this format, as a data URI.
    pub fn probe_source(self) -> &'static str {
        match self {
            ImageFormat::Avif => AVIF_PROBE,
            ImageFormat::Webp => WEBP_PROBE,
        }
    }
}

/// Which modern encodings the browser managed to decode.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq, Serialize, Hash)]
pub struct FormatSupport {
    pub avif: bool,
    pub webp: bool,
}

impl fmt::Display for FormatSupport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, r#"{{"avif":{},"webp":{}}}"#, self.avif, self.webp)
    }
}

/// Something that can try to decode an image source.
///
/// A failed decode is an answer (`false`), not an error. There is no timeout:
/// if the environment never reports back the future never resolves.
pub trait FormatProbe {
    fn probe(&self, src: &'static str) -> LocalBoxFuture<'static, bool>;
}

/// Runs both probes concurrently and merges the outcomes.
pub async fn check_format_support<P: FormatProbe>(probe: &P) -> FormatSupport {
    let (avif, webp) = futures::join!(
        probe.probe(ImageFormat::Avif.probe_source()),
        probe.probe(ImageFormat::Webp.probe_source()),
    );
    log::debug!("format support: avif={avif} webp={webp}");
    FormatSupport { avif, webp }
}

/// Probes the current browser. Outside the browser this is `{false, false}`
/// without attempting anything.
pub async fn detect_format_support() -> FormatSupport {
    #[cfg(feature = "browser")]
    {
        check_format_support(&ImgElementProbe).await
    }
    #[cfg(not(feature = "browser"))]
    {
        FormatSupport::default()
    }
}

/// Probes by loading the source into a detached `<img>` and waiting for
/// `load` or `error`.
#[cfg(feature = "browser")]
pub struct ImgElementProbe;

#[cfg(feature = "browser")]
impl FormatProbe for ImgElementProbe {
    fn probe(&self, src: &'static str) -> LocalBoxFuture<'static, bool> {
        use futures::channel::oneshot;
        use std::{cell::RefCell, rc::Rc};
        use wasm_bindgen::{closure::Closure, JsCast};

        let Ok(img) = web_sys::HtmlImageElement::new() else {
            return Box::pin(async { false });
        };

        let (tx, rx) = oneshot::channel::<bool>();
        let tx = Rc::new(RefCell::new(Some(tx)));
        let settle = move |tx: &Rc<RefCell<Option<oneshot::Sender<bool>>>>, supported: bool| {
            if let Some(tx) = tx.borrow_mut().take() {
                let _ = tx.send(supported);
            }
        };

        let onload = Closure::<dyn FnMut()>::new({
            let tx = tx.clone();
            move || settle(&tx, true)
        });
        let onerror = Closure::<dyn FnMut()>::new(move || settle(&tx, false));

        img.set_onload(Some(onload.as_ref().unchecked_ref()));
        img.set_onerror(Some(onerror.as_ref().unchecked_ref()));
        img.set_src(src);

        Box::pin(async move {
            let supported = rx.await.unwrap_or(false);
            img.set_onload(None);
            img.set_onerror(None);
            drop((onload, onerror));
            supported
        })
    }
}
