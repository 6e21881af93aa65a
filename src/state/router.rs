//! Top-level screen selection.
//!
//! The router is owned by the root component. Child views never see it; they
//! receive callbacks that call the transitions below.

#[cfg(test)]
#[path = "router_test.rs"]
mod router_test;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum View {
    Login,
    Register,
    Chat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Router {
    view: View,
}

impl Router {
    /// Start on the chat room when a credential survived from an earlier
    /// visit, otherwise on the login form.
    #[must_use]
    pub fn initial(has_credential: bool) -> Self {
        Self { view: if has_credential { View::Chat } else { View::Login } }
    }

    #[must_use]
    pub fn view(self) -> View {
        self.view
    }

    /// Login succeeded.
    pub fn on_login(&mut self) -> bool {
        self.transition(View::Login, View::Chat)
    }

    /// Registration succeeded; the user still has to log in.
    pub fn on_register_success(&mut self) -> bool {
        self.transition(View::Register, View::Login)
    }

    pub fn switch_to_register(&mut self) -> bool {
        self.transition(View::Login, View::Register)
    }

    pub fn switch_to_login(&mut self) -> bool {
        self.transition(View::Register, View::Login)
    }

    pub fn on_logout(&mut self) -> bool {
        self.transition(View::Chat, View::Login)
    }

    fn transition(&mut self, from: View, to: View) -> bool {
        if self.view != from {
            tracing::debug!(current = ?self.view, ?from, ?to, "ignoring view transition");
            return false;
        }
        self.view = to;
        true
    }
}
