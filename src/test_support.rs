//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::cell::RefCell;
use std::collections::HashMap;
use std::io;
use std::time::Duration;

use crate::man::{InvokeError, ManTool, ToolInvoker, ToolOutput, ToolSettings};

enum Scripted {
    Output(ToolOutput),
    Timeout,
}

/// A lookup tool with canned answers, keyed by the space-joined arguments.
///
/// Unscripted invocations fail as if the program did not exist.
#[derive(Default)]
pub struct ScriptedInvoker {
    responses: RefCell<HashMap<String, Scripted>>,
    calls: RefCell<Vec<String>>,
}

impl ScriptedInvoker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, args: &str, code: i32, stdout: &str) {
        self.responses
            .borrow_mut()
            .insert(args.to_string(), Scripted::Output(ToolOutput::new(code, stdout)));
    }

    pub fn respond_timeout(&self, args: &str) {
        self.responses
            .borrow_mut()
            .insert(args.to_string(), Scripted::Timeout);
    }

    /// Script a page that resolves and renders: `-w`, `-f` and `-Hcat`.
    ///
    /// The bare name keeps resolving to the first section scripted for it,
    /// and `-f` lists every scripted section.
    pub fn page(&self, name: &str, section: &str, body: &str) {
        let path = format!("/usr/share/man/man{}/{}.{}.gz", section, name, section);
        let line = format!("{} ({})  - test page\n", name, section);
        {
            let mut responses = self.responses.borrow_mut();
            responses
                .entry(format!("-D -w {}", name))
                .or_insert_with(|| Scripted::Output(ToolOutput::new(0, path.as_str())));
            let whatis = format!("-D -f {}", name);
            let listing = match responses.get(&whatis) {
                Some(Scripted::Output(existing)) => format!("{}{}", existing.stdout, line),
                _ => line,
            };
            responses.insert(whatis, Scripted::Output(ToolOutput::new(0, listing)));
        }
        self.respond(&format!("-D -w {} {}", section, name), 0, &path);
        self.respond(
            &format!("-D -Hcat --nh {} {}", section, name),
            0,
            &format!("<html><head><style type=\"text/css\"></style></head><body>\n<h2>NAME</h2>\n{}\n</body></html>\n", body),
        );
    }

    /// Every argument list the tool was invoked with, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl ToolInvoker for ScriptedInvoker {
    fn run(&self, args: &[String], timeout: Duration) -> Result<ToolOutput, InvokeError> {
        let key = args.join(" ");
        self.calls.borrow_mut().push(key.clone());
        match self.responses.borrow().get(&key) {
            Some(Scripted::Output(output)) => Ok(output.clone()),
            Some(Scripted::Timeout) => Err(InvokeError::Timeout(timeout)),
            None => Err(InvokeError::Spawn(io::Error::new(
                io::ErrorKind::NotFound,
                format!("unscripted invocation: {}", key),
            ))),
        }
    }
}

/// A tool over the scripted invoker with default settings.
pub fn scripted_tool(invoker: &ScriptedInvoker) -> ManTool<&ScriptedInvoker> {
    ManTool::new(invoker, ToolSettings::default())
}
