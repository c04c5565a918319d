// Symbol table and register allocation tests

#[cfg(test)]
mod tests {
    use crate::error::InterpreterError;
    use crate::registers::POOL_SIZE;
    use crate::symbols::SymbolTable;

    #[test]
    fn declare_assign_get_roundtrip() {
        let mut table = SymbolTable::new();
        table.declare("x").unwrap();
        table.assign("x", 3.5).unwrap();
        assert_eq!(table.get("x").unwrap(), 3.5);
    }

    #[test]
    fn redeclaration_fails() {
        let mut table = SymbolTable::new();
        table.declare("x").unwrap();
        assert_eq!(
            table.declare("x"),
            Err(InterpreterError::Redeclaration("x".to_string()))
        );
    }

    #[test]
    fn undeclared_names_fail_everywhere() {
        let mut table = SymbolTable::new();
        assert_eq!(
            table.assign("ghost", 1.0),
            Err(InterpreterError::UndeclaredVariable("ghost".to_string()))
        );
        assert_eq!(
            table.get("ghost"),
            Err(InterpreterError::UndeclaredVariable("ghost".to_string()))
        );
        assert_eq!(
            table.register_of("ghost"),
            Err(InterpreterError::UndeclaredVariable("ghost".to_string()))
        );
    }

    #[test]
    fn get_before_first_assignment_fails() {
        let mut table = SymbolTable::new();
        table.declare("x").unwrap();
        assert_eq!(
            table.get("x"),
            Err(InterpreterError::UninitializedVariable("x".to_string()))
        );
    }

    #[test]
    fn registers_are_unique_per_variable() {
        let mut table = SymbolTable::new();
        let a = table.declare("a").unwrap();
        let b = table.declare("b").unwrap();
        assert_ne!(a, b);
        assert_eq!(table.register_of("a").unwrap(), a);
        assert_eq!(table.register_of("b").unwrap(), b);
    }

    #[test]
    fn thirty_third_declaration_exhausts_the_pool() {
        let mut table = SymbolTable::new();
        for i in 0..POOL_SIZE {
            table.declare(&format!("v{}", i)).unwrap();
        }
        assert_eq!(
            table.declare("one_too_many"),
            Err(InterpreterError::RegisterExhaustion)
        );
        // the failed declaration left no entry behind
        assert!(!table.contains("one_too_many"));
        assert_eq!(table.len(), POOL_SIZE);
    }

    #[test]
    fn iteration_follows_declaration_order() {
        let mut table = SymbolTable::new();
        for name in ["zeta", "alpha", "mid"] {
            table.declare(name).unwrap();
        }
        let names: Vec<&str> = table.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }
}
