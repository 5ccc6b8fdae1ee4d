mod connectivity;
mod id_set;
