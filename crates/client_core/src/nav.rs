use shared::domain::Screen;

/// Browser-style navigation between the two top-level screens: a current
/// screen plus back/forward history stacks.
#[derive(Debug)]
pub struct Nav {
    current: Screen,
    back_stack: Vec<Screen>,
    forward_stack: Vec<Screen>,
}

impl Nav {
    pub fn new(initial: Screen) -> Self {
        Self {
            current: initial,
            back_stack: Vec::new(),
            forward_stack: Vec::new(),
        }
    }

    pub fn current(&self) -> Screen {
        self.current
    }

    /// Switches to the other screen, pushing the previous one onto
    /// history. Forward history is invalidated, as with a browser.
    pub fn toggle(&mut self) -> Screen {
        let next = match self.current {
            Screen::Dashboard => Screen::Profile,
            Screen::Profile => Screen::Dashboard,
        };
        self.back_stack.push(self.current);
        self.forward_stack.clear();
        self.current = next;
        next
    }

    /// Steps back through history. With no history left the dashboard is
    /// the landing screen.
    pub fn back(&mut self) -> Screen {
        match self.back_stack.pop() {
            Some(previous) => {
                self.forward_stack.push(self.current);
                self.current = previous;
            }
            None => self.current = Screen::Dashboard,
        }
        self.current
    }

    pub fn forward(&mut self) -> Screen {
        if let Some(next) = self.forward_stack.pop() {
            self.back_stack.push(self.current);
            self.current = next;
        }
        self.current
    }
}
