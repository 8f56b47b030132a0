//! Declarative macros for tags and closed tagged unions.

/// Declare a tag type.
///
/// `tag!(pub Shipped => Shipment)` declares a tag whose payload is a
/// `Shipment`. The short form `tag!(pub Usd)` declares a marker tag: its
/// payload is the `&'static str` label itself, obtained with
/// [`Tagged::marker`](crate::Tagged::marker).
///
/// The declared type is uninhabited; it only exists at the type level.
///
/// ```
/// use statecraft_types::{Tagged, tag};
///
/// tag!(pub Usd);
/// tag!(pub Cents => u64);
///
/// assert_eq!(*Tagged::<Usd>::marker().value(), "Usd");
/// assert_eq!(Tagged::<Cents>::new(250).into_value(), 250);
/// ```
#[macro_export]
macro_rules! tag {
    ($(#[$meta:meta])* $vis:vis $name:ident => $payload:ty) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {}

        impl $crate::Tag for $name {
            const NAME: &'static str = stringify!($name);
            type Payload = $payload;
        }
    };
    ($(#[$meta:meta])* $vis:vis $name:ident) => {
        $crate::tag!($(#[$meta])* $vis $name => &'static str);
    };
}

/// Declare a closed set of tagged variants.
///
/// Generates an `enum` with one variant per tag, a `tag()` accessor, a
/// `From<Tagged<_>>` conversion per variant, and a handler struct with one
/// field per variant. `match_tag` consumes the value and calls exactly the
/// handler matching its discriminant.
///
/// ```
/// use statecraft_types::{Tagged, tag, tagged_union};
///
/// tag!(Cash);
/// tag!(Card => String);
///
/// tagged_union! {
///     #[derive(Debug, Clone)]
///     pub enum Method with MethodHandlers {
///         Cash(Cash) => cash,
///         Card(Card) => card,
///     }
/// }
///
/// let method = Method::from(Tagged::<Card>::new("4111".to_owned()));
/// assert_eq!(method.tag(), "Card");
///
/// let label = method.match_tag(MethodHandlers {
///     cash: Box::new(|_| "cash".to_owned()),
///     card: Box::new(|card| format!("card {}", card.value())),
/// });
/// assert_eq!(label, "card 4111");
/// ```
///
/// Leaving out a handler is rejected when the handler struct is built:
///
/// ```compile_fail
/// use statecraft_types::{Tagged, tag, tagged_union};
///
/// tag!(Cash);
/// tag!(Card => String);
///
/// tagged_union! {
///     pub enum Method with MethodHandlers {
///         Cash(Cash) => cash,
///         Card(Card) => card,
///     }
/// }
///
/// let method = Method::from(Tagged::<Cash>::marker());
/// let label: &str = method.match_tag(MethodHandlers {
///     cash: Box::new(|_| "cash"),
/// });
/// ```
///
/// and so is a plain `match` that skips a variant:
///
/// ```compile_fail
/// use statecraft_types::{Tagged, tag, tagged_union};
///
/// tag!(Cash);
/// tag!(Card => String);
///
/// tagged_union! {
///     pub enum Method with MethodHandlers {
///         Cash(Cash) => cash,
///         Card(Card) => card,
///     }
/// }
///
/// let method = Method::from(Tagged::<Cash>::marker());
/// let label = match method {
///     Method::Cash(_) => "cash",
/// };
/// ```
#[macro_export]
macro_rules! tagged_union {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident with $handlers:ident {
            $( $variant:ident ( $tag:ty ) => $field:ident ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis enum $name {
            $( $variant($crate::Tagged<$tag>), )+
        }

        /// One handler per variant of the union.
        $vis struct $handlers<'a, R> {
            $( pub $field: Box<dyn FnOnce($crate::Tagged<$tag>) -> R + 'a>, )+
        }

        impl $name {
            #[must_use]
            pub fn tag(&self) -> &'static str {
                match self {
                    $( Self::$variant(value) => value.tag(), )+
                }
            }

            /// Dispatch to the handler for this value's discriminant.
            pub fn match_tag<R>(self, handlers: $handlers<'_, R>) -> R {
                match self {
                    $( Self::$variant(value) => (handlers.$field)(value), )+
                }
            }
        }

        $(
            impl From<$crate::Tagged<$tag>> for $name {
                fn from(value: $crate::Tagged<$tag>) -> Self {
                    Self::$variant(value)
                }
            }
        )+
    };
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use crate::Tagged;

    tag!(Pending => u32);
    tag!(Running => u32);
    tag!(Done);

    tagged_union! {
        #[derive(Debug, Clone, PartialEq)]
        enum Job with JobHandlers {
            Pending(Pending) => pending,
            Running(Running) => running,
            Done(Done) => done,
        }
    }

    fn all_jobs() -> Vec<Job> {
        vec![
            Tagged::<Pending>::new(1).into(),
            Tagged::<Running>::new(2).into(),
            Tagged::<Done>::marker().into(),
        ]
    }

    #[test]
    fn tag_follows_variant() {
        let tags: Vec<&str> = all_jobs().iter().map(Job::tag).collect();
        assert_eq!(tags, vec!["Pending", "Running", "Done"]);
    }

    #[test]
    fn match_tag_calls_exactly_one_handler_once() {
        for job in all_jobs() {
            let expected = job.tag();
            let pending = Cell::new(0);
            let running = Cell::new(0);
            let done = Cell::new(0);

            let seen = job.match_tag(JobHandlers {
                pending: Box::new(|value| {
                    pending.set(pending.get() + 1);
                    value.tag()
                }),
                running: Box::new(|value| {
                    running.set(running.get() + 1);
                    value.tag()
                }),
                done: Box::new(|value| {
                    done.set(done.get() + 1);
                    value.tag()
                }),
            });

            assert_eq!(seen, expected);
            assert_eq!(pending.get() + running.get() + done.get(), 1);
        }
    }

    #[test]
    fn handler_receives_narrowed_payload() {
        let job: Job = Tagged::<Running>::new(7).into();
        let payload = job.match_tag(JobHandlers {
            pending: Box::new(|_| None),
            running: Box::new(|value| Some(value.into_value())),
            done: Box::new(|_| None),
        });
        assert_eq!(payload, Some(7));
    }
}
