#![allow(non_snake_case)]
//! Stock widgets. Each constructor returns a ready [`Control`](crate::Control);
//! reach the widget state through `Control::widget_mut::<W>()`.

pub mod button;
pub mod container;
pub mod label;
pub mod scroll_bar;
pub mod shape;

pub use button::{Button, ButtonWidget};
pub use container::{Container, ContainerLayout, ContainerWidget};
pub use label::{Label, LabelWidget, MonospaceMeasurer, TextMeasurer};
pub use scroll_bar::{LinearDirection, ScrollAction, ScrollBar, ScrollBarWidget, ScrollEvent};
pub use shape::{BorderEdges, Shape, ShapeKind, ShapeWidget, StateColors, TriangleDirection};
