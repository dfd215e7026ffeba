use crate::config::Credentials;
use crate::dimensions::Dimensions;
use crate::url::build_image_url;

/// What the component should render right now.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImageState {
    /// No project id or public key: render the placeholder.
    Unconfigured,
    /// Configured, but there is no URL yet (not measured, or the URL could
    /// not be built). Render the sized wrapper without an image.
    ConfiguredUnmeasured(Credentials),
    ConfiguredReady { credentials: Credentials, url: String },
}

impl ImageState {
    pub fn derive(
        credentials: Option<Credentials>,
        media_id: &str,
        dimensions: Dimensions,
        max_width: Option<u32>,
    ) -> Self {
        let Some(credentials) = credentials else {
            return ImageState::Unconfigured;
        };

        match build_image_url(&credentials, media_id, dimensions, max_width) {
            Ok(Some(url)) => {
                log::debug!("image url rebuilt: {url}");
                ImageState::ConfiguredReady { credentials, url }
            }
            Ok(None) => ImageState::ConfiguredUnmeasured(credentials),
            Err(err) => {
                log::warn!("could not build image url for media `{media_id}`: {err}");
                ImageState::ConfiguredUnmeasured(credentials)
            }
        }
    }
}

#[cfg(test)]
mod state_tests {
    use super::*;
    use crate::config::{resolve_credentials, PoststackConfig};

    fn measured() -> Dimensions {
        Dimensions {
            element_width: 400,
            viewport_width: 800,
        }
    }

    fn configured() -> PoststackConfig {
        PoststackConfig::default()
            .with_project_id("p")
            .with_public_key("k")
    }

    #[test]
    fn unconfigured_without_credentials() {
        let state = ImageState::derive(None, "m", measured(), None);
        assert_eq!(state, ImageState::Unconfigured);
    }

    #[test]
    fn configuration_is_decided_before_measurement() {
        let state = ImageState::derive(None, "m", Dimensions::default(), None);
        assert_eq!(state, ImageState::Unconfigured);

        let credentials = resolve_credentials(None, None, &configured());
        let state = ImageState::derive(credentials.clone(), "m", Dimensions::default(), None);
        assert_eq!(state, ImageState::ConfiguredUnmeasured(credentials.unwrap()));
    }

    #[test]
    fn unmeasured_renders_no_image() {
        let credentials = resolve_credentials(None, None, &configured());

        let state = ImageState::derive(credentials, "m", Dimensions::default(), Some(999));
        assert!(matches!(state, ImageState::ConfiguredUnmeasured(_)));
    }

    #[test]
    fn ready_once_measured() {
        let config = configured().with_endpoint("https://e");
        let credentials = resolve_credentials(None, None, &config);

        let state = ImageState::derive(credentials, "m", measured(), None);
        match state {
            ImageState::ConfiguredReady { credentials, url } => {
                assert_eq!(credentials.project_id, "p");
                assert_eq!(
                    url,
                    "https://e/projects/p/media/m?public_key=k&viewport_width=800&max_width=400"
                );
            }
            other => panic!("expected a ready state, got {other:?}"),
        }
    }

    #[test]
    fn url_errors_degrade_to_unmeasured() {
        let credentials = resolve_credentials(None, None, &configured());

        let state = ImageState::derive(credentials, "", measured(), None);
        assert!(matches!(state, ImageState::ConfiguredUnmeasured(_)));
    }

    #[test]
    fn configuration_matrix() {
        let config_values = [None, Some("x")];
        for env_project in config_values {
            for env_key in config_values {
                for prop_project in config_values {
                    for prop_key in config_values {
                        let config = PoststackConfig {
                            project_id: env_project.map(String::from),
                            public_key: env_key.map(String::from),
                            endpoint: None,
                        };
                        let credentials = resolve_credentials(prop_project, prop_key, &config);
                        let state = ImageState::derive(credentials, "m", measured(), None);

                        let expected = (prop_project.is_some() || env_project.is_some())
                            && (prop_key.is_some() || env_key.is_some());
                        if expected {
                            assert!(matches!(state, ImageState::ConfiguredReady { .. }));
                        } else {
                            assert_eq!(state, ImageState::Unconfigured);
                        }
                    }
                }
            }
        }
    }
}
