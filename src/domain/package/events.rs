use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AddOnEvent {
    PreInstall { addon: String },
    PostInstall { addon: String },
    PreUninstall { addon: String },
    PostUninstall { addon: String },
    PreActivate { addon: String },
    PostActivate { addon: String },
    PreDeactivate { addon: String },
    PostDeactivate { addon: String },
    PreUpdate { addon: String, from: Option<String>, to: Option<String> },
    PostUpdate { addon: String, from: Option<String>, to: Option<String> },
}

impl AddOnEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::PreInstall { .. } => "SLY_ADDON_PRE_INSTALL",
            Self::PostInstall { .. } => "SLY_ADDON_POST_INSTALL",
            Self::PreUninstall { .. } => "SLY_ADDON_PRE_UNINSTALL",
            Self::PostUninstall { .. } => "SLY_ADDON_POST_UNINSTALL",
            Self::PreActivate { .. } => "SLY_ADDON_PRE_ACTIVATE",
            Self::PostActivate { .. } => "SLY_ADDON_POST_ACTIVATE",
            Self::PreDeactivate { .. } => "SLY_ADDON_PRE_DEACTIVATE",
            Self::PostDeactivate { .. } => "SLY_ADDON_POST_DEACTIVATE",
            Self::PreUpdate { .. } => "SLY_ADDON_PRE_UPDATE",
            Self::PostUpdate { .. } => "SLY_ADDON_POST_UPDATE",
        }
    }
}
