//! Smart Truncation Module
//!
//! Priority-based truncation of assembled documentation pages: token
//! estimation, section parsing and classification, budget fill, and the
//! named strategies that bias classification for one pass.

pub mod engine;
pub mod parser;
pub mod priority;
pub mod section;
pub mod strategy;
pub mod tokens;

// Re-export public types for external use
pub use engine::{simple_truncate, SmartTruncator, DEFAULT_MAX_TOKENS, MIN_PARTIAL_TOKENS};
pub use parser::parse_documentation;
pub use priority::{PriorityConfig, HIGH_PRIORITY_WIDGETS};
pub use section::{ContentPriority, DocumentationSection, SectionCategory, SectionKind};
pub use strategy::{
    truncate_flutter_docs, AdaptiveTruncator, TruncationError, TruncationMetadata,
    TruncationStrategy,
};
pub use tokens::{
    accurate_tokens, approximate_tokens, count_tokens, estimate_cost, estimate_markdown,
    set_accurate_mode,
};

#[cfg(test)]
pub(crate) mod test_fixtures {
    /// A realistic Container documentation page, large enough that every
    /// budget in the tests forces real truncation decisions.
    pub fn sample_documentation() -> String {
        let mut doc = String::from(
            r#"# Container

## Description
A convenience widget that combines common painting, positioning, and sizing widgets.
Container is a very commonly used widget in Flutter applications. It provides a way to
customize the appearance and layout of child widgets. The Container widget can be used
to add padding, margins, borders, background color, and many other styling options
to its child widget.

## Constructors

### Container({Key? key, AlignmentGeometry? alignment, EdgeInsetsGeometry? padding, Color? color, Decoration? decoration, Decoration? foregroundDecoration, double? width, double? height, BoxConstraints? constraints, EdgeInsetsGeometry? margin, Matrix4? transform, AlignmentGeometry? transformAlignment, Widget? child, Clip clipBehavior = Clip.none})
```dart
Container({
  Key? key,
  this.alignment,
  this.padding,
  this.color,
  this.decoration,
  this.foregroundDecoration,
  double? width,
  double? height,
  BoxConstraints? constraints,
  this.margin,
  this.transform,
  this.transformAlignment,
  this.child,
  this.clipBehavior = Clip.none,
})
```
Creates a widget that combines common painting, positioning, and sizing widgets.

### Container.fixed({required double width, required double height, Widget? child})
```dart
Container.fixed({
  required double width,
  required double height,
  Widget? child,
})
```
Creates a container with fixed dimensions.

## Properties

- **alignment**: How to align the child within the container
- **padding**: Empty space to inscribe inside the decoration
- **color**: The color to paint behind the child
- **decoration**: The decoration to paint behind the child
- **foregroundDecoration**: The decoration to paint in front of the child
- **width**: Container width constraint
- **height**: Container height constraint
- **constraints**: Additional constraints to apply to the child
- **margin**: Empty space to surround the decoration and child
- **transform**: The transformation matrix to apply before painting
- **transformAlignment**: The alignment of the origin
- **child**: The child contained by the container
- **clipBehavior**: How to clip the contents

## Methods

### build(BuildContext context)
```dart
@override
Widget build(BuildContext context) {
  Widget? current = child;

  if (child == null && (constraints == null || !constraints!.isTight)) {
    current = LimitedBox(
      maxWidth: 0.0,
      maxHeight: 0.0,
      child: ConstrainedBox(constraints: const BoxConstraints.expand()),
    );
  }

  if (alignment != null)
    current = Align(alignment: alignment!, child: current);

  final EdgeInsetsGeometry? effectivePadding = _paddingIncludingDecoration;
  if (effectivePadding != null)
    current = Padding(padding: effectivePadding, child: current);

  if (color != null)
    current = ColoredBox(color: color!, child: current);

  if (clipBehavior != Clip.none) {
    assert(decoration != null);
    current = ClipPath(
      clipper: _DecorationClipper(
        textDirection: Directionality.maybeOf(context),
        decoration: decoration!,
      ),
      clipBehavior: clipBehavior,
      child: current,
    );
  }

  if (decoration != null)
    current = DecoratedBox(decoration: decoration!, child: current);

  if (constraints != null)
    current = ConstrainedBox(constraints: constraints!, child: current);

  if (margin != null)
    current = Padding(padding: margin!, child: current);

  if (transform != null)
    current = Transform(transform: transform!, alignment: transformAlignment, child: current);

  return current!;
}
```
Describes the part of the user interface represented by this widget.

### debugFillProperties(DiagnosticPropertiesBuilder properties)
```dart
@override
void debugFillProperties(DiagnosticPropertiesBuilder properties) {
  super.debugFillProperties(properties);
  properties.add(DiagnosticsProperty<AlignmentGeometry>('alignment', alignment, showName: false, defaultValue: null));
  properties.add(DiagnosticsProperty<EdgeInsetsGeometry>('padding', padding, defaultValue: null));
  properties.add(DiagnosticsProperty<Clip>('clipBehavior', clipBehavior, defaultValue: Clip.none));
}
```
Add additional properties associated with the node.

### createElement()
```dart
@override
StatelessElement createElement() => StatelessElement(this);
```
Creates a StatelessElement to manage this widget's location in the tree.

### toStringShort()
```dart
@override
String toStringShort() {
  return key == null ? '$runtimeType' : '$runtimeType-$key';
}
```
A brief description of this object, usually just the runtimeType and hashCode.

## Code Examples

"#,
        );

        for i in 1..=5 {
            doc.push_str(&format!(
                "#### Example {i}:\n```dart\nContainer(\n  width: {w},\n  height: {w},\n  color: Colors.blue,\n  child: Center(\n    child: Text(\n      'Example {i}',\n      style: TextStyle(color: Colors.white, fontSize: 24),\n    ),\n  ),\n)\n```\n\n",
                w = i * 100
            ));
        }

        doc
    }
}
