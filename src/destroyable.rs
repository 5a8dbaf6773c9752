/// Implemented by values that subscribe to a channel holding an `Rc` back to
/// themselves; `destroy` breaks that cycle.
pub trait Destroyable {
    fn destroy(&mut self);
}
