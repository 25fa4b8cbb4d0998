//! Default config file with inline documentation.

pub(crate) fn default_config_toml() -> &'static str {
    r##"# Hostframe configuration
# Only override what you want to change -- missing fields use defaults.

[logging]
# level = "info"              # trace, debug, info, warn, error

[window]
# title = "Hostframe"
# width = 400                 # 100-8192
# height = 400                # 100-8192
# x = 700
# y = 200

[frame]
# content_root = "assets/apps"
# devtools = false
# user_agent = "Hostframe/0.1"
# extra_origins = []          # e.g. ["https://example.com/"]

[app]
# launch = "IframeDemo"
# resource = "/data/index.html"
"##
}
