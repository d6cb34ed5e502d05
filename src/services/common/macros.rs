/// Declares a typed record for a remote object's property bag.
///
/// Every field is wrapped in `Option`: `None` means "not reported", which is
/// different from a reported default. Each field names the D-Bus property key
/// it is decoded from and the decoder that turns the variant into the field
/// type. Keys that no field claims are ignored.
///
/// # Example
/// ```ignore
/// property_record! {
///     /// Properties of `org.ofono.Modem`.
///     pub struct ModemProperties {
///         /// Radio power.
///         powered: bool = "Powered" => decode::boolean,
///         /// Vendor supplied name.
///         name: String = "Name" => decode::string,
///     }
/// }
/// ```
#[macro_export]
macro_rules! property_record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field:ident : $ty:ty = $key:literal => $decoder:path
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq)]
        $vis struct $name {
            $(
                $(#[$field_meta])*
                pub $field: Option<$ty>,
            )+
        }

        impl $crate::services::common::PropertySet for $name {
            fn merge(&mut self, update: &Self) -> bool {
                let mut changed = false;
                $(
                    if let Some(value) = &update.$field {
                        if self.$field.as_ref() != Some(value) {
                            self.$field = Some(value.clone());
                            changed = true;
                        }
                    }
                )+
                changed
            }

            fn without(&self, mask: &Self) -> Self {
                Self {
                    $(
                        $field: if mask.$field.is_some() {
                            None
                        } else {
                            self.$field.clone()
                        },
                    )+
                }
            }

            fn is_empty(&self) -> bool {
                true $(&& self.$field.is_none())+
            }

            fn decode(&mut self, name: &str, value: &::zbus::zvariant::Value<'_>) {
                match name {
                    $(
                        $key => self.$field = $decoder(value),
                    )+
                    _ => {}
                }
            }
        }
    };
}
