/// Applies a transformation to a named definition in place.
///
/// The caller owns both the name and the definition and holds exclusive
/// access to the definition for the duration of the call. Implementations
/// mutate `definition` and return nothing; whether a second call with the
/// same name repeats the mutation is up to each implementation.
///
/// Any `Fn(&str, &mut D)` closure is a transformer as well.
pub trait Transformation<D: ?Sized> {
    fn transform(&self, name: &str, definition: &mut D);
}

impl<D, F> Transformation<D> for F
where
    D: ?Sized,
    F: Fn(&str, &mut D),
{
    fn transform(&self, name: &str, definition: &mut D) {
        self(name, definition)
    }
}
