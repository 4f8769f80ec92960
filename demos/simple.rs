use rdl_core::analyze;

fn main() {
    let spec = r#"
name: Library
resources:
  - name: Books
    operations: [Create, Read, Update]
    fields:
      - name: title
        type: String
        operations: [Create, Read, Update]
      - name: isbn
        type: String
        operations: [Create, Read]
"#;

    match analyze(spec, "library.yaml") {
        Ok(result) => match result.to_yaml() {
            Ok(yaml) => println!("Expanded specification:\n{yaml}"),
            Err(e) => eprintln!("Failed to serialize: {e}"),
        },
        Err(e) => {
            eprintln!("{:?}", miette::Report::new(e));
        }
    }
}
