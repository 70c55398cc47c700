//! Command handler capability injected into the engines.

/// Receives completed commands from a bus engine.
///
/// The initiator reports read results as `(address byte, value)`. The
/// responder reports writes as `(local sub-address, value)`.
pub trait CommandHandler {
    fn on_command(&mut self, address: u8, value: u8);

    /// Called by the responder when a write transaction targets `address`,
    /// before any data byte arrives.
    fn on_target(&mut self, _address: u8) {}
}

impl<H: CommandHandler + ?Sized> CommandHandler for &mut H {
    fn on_command(&mut self, address: u8, value: u8) {
        (**self).on_command(address, value);
    }

    fn on_target(&mut self, address: u8) {
        (**self).on_target(address);
    }
}

/// Adapts a closure into a [`CommandHandler`].
pub struct FnHandler<F>(pub F);

impl<F: FnMut(u8, u8)> CommandHandler for FnHandler<F> {
    fn on_command(&mut self, address: u8, value: u8) {
        (self.0)(address, value);
    }
}

impl<F> std::fmt::Debug for FnHandler<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("FnHandler")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Log(Vec<(char, u8, u8)>);

    impl CommandHandler for Log {
        fn on_command(&mut self, address: u8, value: u8) {
            self.0.push(('c', address, value));
        }

        fn on_target(&mut self, address: u8) {
            self.0.push(('t', address, 0));
        }
    }

    #[test]
    fn closure_handler_forwards() {
        let mut seen = Vec::new();
        {
            let mut h = FnHandler(|a: u8, v: u8| seen.push((a, v)));
            h.on_target(1);
            h.on_command(1, 99);
        }
        assert_eq!(seen, vec![(1, 99)]);
    }

    #[test]
    fn mutable_reference_delegates() {
        fn feed<H: CommandHandler>(mut handler: H) {
            handler.on_target(0);
            handler.on_command(0, 7);
        }

        let mut log = Log::default();
        feed(&mut log);
        assert_eq!(log.0, vec![('t', 0, 0), ('c', 0, 7)]);
    }
}
