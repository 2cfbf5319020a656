use log::{debug, warn};

use super::{ManError, ManTool, ToolInvoker};
use crate::markup;
use crate::query::DocumentQuery;

/// The two renderings of a page as the tool produced them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    pub hypertext: String,
    /// Only fetched when the hypertext carries image markers.
    pub plain: Option<String>,
}

impl<I: ToolInvoker> ManTool<I> {
    /// Fetch the hypertext rendering of a resolved page, plus its plain-glyph
    /// rendering when tables have to be reconstructed.
    pub fn fetch(&self, title: &str) -> Result<FetchedPage, ManError> {
        let args = match DocumentQuery::from_title(title) {
            Some(query) => query.tool_args(),
            None => vec![title.to_string()],
        };

        let hypertext = self.fetch_rendering(title, &["-Hcat", "--nh"], &args)?;

        let markers = markup::image_markers(&hypertext).len();
        let plain = if markers > 0 {
            debug!("{} has {} image marker(s), fetching plain rendering", title, markers);
            match self.fetch_rendering(title, &["-Pcat", "--nh"], &args) {
                Ok(text) => Some(text),
                Err(e) => {
                    warn!("Plain rendering of {} unavailable: {:?}", title, e.reason());
                    None
                }
            }
        } else {
            None
        };

        Ok(FetchedPage { hypertext, plain })
    }

    fn fetch_rendering(&self, title: &str, mode: &[&str], args: &[String]) -> Result<String, ManError> {
        let output = self.invoke(mode, args).map_err(|e| ManError::Fetch {
            title: title.to_string(),
            reason: e.to_string(),
        })?;
        if !output.success() {
            return Err(ManError::Fetch {
                title: title.to_string(),
                reason: format!("{} exited with {:?}", mode.join(" "), output.code),
            });
        }
        Ok(output.stdout)
    }
}
