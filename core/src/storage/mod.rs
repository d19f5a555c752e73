mod note_book;

pub use note_book::NoteBook;
