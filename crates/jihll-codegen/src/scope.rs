//! Compile-time locals.

struct Local {
    name: String,
    depth: usize,
}

/// Locals of the function being compiled, in slot order.
#[derive(Default)]
pub(crate) struct Scope {
    locals: Vec<Local>,
    depth: usize,
}

impl Scope {
    pub fn begin(&mut self) {
        self.depth += 1;
    }

    /// Leave the innermost block; returns how many locals went out of scope.
    pub fn end(&mut self) -> usize {
        self.depth = self.depth.saturating_sub(1);
        let mut popped = 0;
        while self.locals.last().is_some_and(|l| l.depth > self.depth) {
            self.locals.pop();
            popped += 1;
        }
        popped
    }

    /// Declare a local in the current block and return its slot.
    pub fn declare(&mut self, name: &str) -> usize {
        self.locals.push(Local {
            name: name.to_string(),
            depth: self.depth,
        });
        self.locals.len() - 1
    }

    /// Most recent declaration wins.
    pub fn resolve(&self, name: &str) -> Option<usize> {
        self.locals.iter().rposition(|l| l.name == name)
    }
}
